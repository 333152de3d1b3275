//! Device input: movement keys, pointer clicks and surface resizes

pub mod console;
pub mod resolver;

pub use resolver::{InputResolver, KeyOutcome};

/// Device event delivered by the host input capability
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Physical key code, e.g. `ArrowUp` or `KeyW`
    KeyDown(String),
    KeyUp(String),
    /// Surface-relative pointer position
    Click { x: f64, y: f64 },
    Resize { width: f64, height: f64 },
}

//! Client-side world state: the entity mirror and the camera over it

pub mod camera;
pub mod store;

pub use camera::Camera;
pub use store::EntityStore;

/// Size of the playable world in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f64,
    pub height: f64,
}

impl WorldBounds {
    /// Clamp a world position into `[0, width] x [0, height]`
    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (x.clamp(0.0, self.width), y.clamp(0.0, self.height))
    }
}

//! Held-key state machine and click handling

use tracing::trace;

use crate::world::WorldBounds;
use crate::ws::protocol::{ClientMsg, Direction};

/// Physical key codes bound to movement
const KEY_BINDINGS: [(&str, Direction); 8] = [
    ("ArrowUp", Direction::Up),
    ("KeyW", Direction::Up),
    ("ArrowDown", Direction::Down),
    ("KeyS", Direction::Down),
    ("ArrowLeft", Direction::Left),
    ("KeyA", Direction::Left),
    ("ArrowRight", Direction::Right),
    ("KeyD", Direction::Right),
];

/// Direction bound to a physical key, if it is a movement key
pub fn movement_direction(code: &str) -> Option<Direction> {
    KEY_BINDINGS
        .iter()
        .find(|(bound, _)| *bound == code)
        .map(|(_, dir)| *dir)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    /// Nothing held; last command was stop or nothing
    Idle,
    /// At least one key held; last command was a directional move
    Moving,
}

/// Result of feeding one key event to the resolver
#[derive(Debug, Clone, PartialEq)]
pub struct KeyOutcome {
    /// The key was a movement key; the host should suppress its default action
    pub handled: bool,
    pub command: Option<ClientMsg>,
}

impl KeyOutcome {
    fn ignored() -> Self {
        Self {
            handled: false,
            command: None,
        }
    }
}

/// Turns key and pointer input into movement commands.
///
/// Held keys are kept in press order; the earliest still-held key decides the
/// direction. Every key transition that leaves a key held re-sends a move,
/// even when the direction did not change.
#[derive(Debug)]
pub struct InputResolver {
    held: Vec<(String, Direction)>,
    state: MotionState,
}

impl InputResolver {
    pub fn new() -> Self {
        Self {
            held: Vec::new(),
            state: MotionState::Idle,
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Direction of the earliest pressed key still held
    pub fn resolved_direction(&self) -> Option<Direction> {
        self.held.first().map(|(_, dir)| *dir)
    }

    pub fn key_down(&mut self, code: &str) -> KeyOutcome {
        let Some(direction) = movement_direction(code) else {
            return KeyOutcome::ignored();
        };
        // Auto-repeat keeps the original press position
        if !self.held.iter().any(|(held, _)| held == code) {
            self.held.push((code.to_string(), direction));
        }
        self.after_transition()
    }

    pub fn key_up(&mut self, code: &str) -> KeyOutcome {
        if movement_direction(code).is_none() {
            return KeyOutcome::ignored();
        }
        self.held.retain(|(held, _)| held != code);
        self.after_transition()
    }

    /// Absolute move to a clicked world position, clamped into the world.
    /// Independent of the held-key state. Non-finite positions yield nothing.
    pub fn click(&self, world_x: f64, world_y: f64, bounds: WorldBounds) -> Option<ClientMsg> {
        if !world_x.is_finite() || !world_y.is_finite() {
            trace!(world_x, world_y, "ignoring non-finite click");
            return None;
        }
        let (x, y) = bounds.clamp(world_x, world_y);
        Some(ClientMsg::move_to(x, y))
    }

    fn after_transition(&mut self) -> KeyOutcome {
        let command = match (self.resolved_direction(), self.state) {
            (Some(direction), _) => {
                self.state = MotionState::Moving;
                Some(ClientMsg::move_direction(direction))
            }
            (None, MotionState::Moving) => {
                self.state = MotionState::Idle;
                Some(ClientMsg::Stop)
            }
            (None, MotionState::Idle) => None,
        };
        trace!(state = ?self.state, held = self.held.len(), "input transition");
        KeyOutcome {
            handled: true,
            command,
        }
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new()
    }
}

//! Viewport offset and world/screen transforms

use crate::ws::protocol::Player;

/// Top-left of the visible world window plus the surface size it maps onto
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    viewport_x: f64,
    viewport_y: f64,
    width: f64,
    height: f64,
}

impl Camera {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport_x: 0.0,
            viewport_y: 0.0,
            width,
            height,
        }
    }

    pub fn viewport_x(&self) -> f64 {
        self.viewport_x
    }

    pub fn viewport_y(&self) -> f64 {
        self.viewport_y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Center on `player`, keeping the window inside the world
    pub fn recenter_on(
        &mut self,
        player: &Player,
        viewport_width: f64,
        viewport_height: f64,
        world_width: f64,
        world_height: f64,
    ) {
        self.width = viewport_width;
        self.height = viewport_height;
        self.viewport_x = clamp_axis(player.x - viewport_width / 2.0, viewport_width, world_width);
        self.viewport_y =
            clamp_axis(player.y - viewport_height / 2.0, viewport_height, world_height);
    }

    /// Track a new surface size without moving past the world edge
    pub fn resize(&mut self, width: f64, height: f64, world_width: f64, world_height: f64) {
        self.width = width;
        self.height = height;
        self.viewport_x = clamp_axis(self.viewport_x, width, world_width);
        self.viewport_y = clamp_axis(self.viewport_y, height, world_height);
    }

    pub fn world_to_screen(&self, world_x: f64, world_y: f64) -> (f64, f64) {
        (world_x - self.viewport_x, world_y - self.viewport_y)
    }

    pub fn screen_to_world(&self, screen_x: f64, screen_y: f64) -> (f64, f64) {
        (screen_x + self.viewport_x, screen_y + self.viewport_y)
    }

    /// Inclusive screen-space bounds check, padded by `margin` on every side
    pub fn is_visible(&self, world_x: f64, world_y: f64, margin: f64) -> bool {
        let (x, y) = self.world_to_screen(world_x, world_y);
        x >= -margin && x <= self.width + margin && y >= -margin && y <= self.height + margin
    }
}

/// Collapses to 0 when the world is smaller than the viewport
fn clamp_axis(offset: f64, viewport: f64, world: f64) -> f64 {
    let max = (world - viewport).max(0.0);
    offset.clamp(0.0, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::store::test_support::player;

    const WORLD: f64 = 2048.0;

    #[test]
    fn recenter_near_origin_clamps_to_zero() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.recenter_on(&player("p1", 10.0, 10.0), 800.0, 600.0, WORLD, WORLD);
        assert_eq!(camera.viewport_x(), 0.0);
        assert_eq!(camera.viewport_y(), 0.0);
    }

    #[test]
    fn recenter_near_far_corner_clamps_to_world_edge() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.recenter_on(&player("p1", 2040.0, 2040.0), 800.0, 600.0, WORLD, WORLD);
        assert_eq!(camera.viewport_x(), 1248.0);
        assert_eq!(camera.viewport_y(), 1448.0);
    }

    #[test]
    fn recenter_in_open_space_centers_player() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.recenter_on(&player("p1", 1000.0, 900.0), 800.0, 600.0, WORLD, WORLD);
        assert_eq!(camera.world_to_screen(1000.0, 900.0), (400.0, 300.0));
    }

    #[test]
    fn world_smaller_than_viewport_pins_to_origin() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.recenter_on(&player("p1", 300.0, 200.0), 800.0, 600.0, 500.0, 400.0);
        assert_eq!((camera.viewport_x(), camera.viewport_y()), (0.0, 0.0));
    }

    #[test]
    fn resize_reclamps_existing_offset() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.recenter_on(&player("p1", 2040.0, 2040.0), 800.0, 600.0, WORLD, WORLD);
        camera.resize(1024.0, 768.0, WORLD, WORLD);
        assert_eq!(camera.viewport_x(), 1024.0);
        assert_eq!(camera.viewport_y(), 1280.0);
    }

    #[test]
    fn visibility_margin_is_inclusive() {
        let camera = Camera::new(800.0, 600.0);
        assert!(camera.is_visible(-32.0, 100.0, 32.0));
        assert!(!camera.is_visible(-33.0, 100.0, 32.0));
        assert!(camera.is_visible(832.0, 632.0, 32.0));
        assert!(!camera.is_visible(400.0, 633.0, 32.0));
    }

    #[test]
    fn screen_and_world_transforms_are_inverse() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.recenter_on(&player("p1", 1200.0, 700.0), 800.0, 600.0, WORLD, WORLD);
        let (sx, sy) = camera.world_to_screen(1234.0, 567.0);
        assert_eq!(camera.screen_to_world(sx, sy), (1234.0, 567.0));
    }
}

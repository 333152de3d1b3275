//! Full-scene redraw: map, culled avatars and name labels

use tracing::trace;

use crate::util::time::Timer;
use crate::world::{Camera, EntityStore};
use crate::ws::protocol::{Direction, Player};

use super::assets::{AssetCache, AssetKey};
use super::surface::{DrawSurface, Rect, TextStyle};

/// Gap between the top of a sprite and its label baseline
const LABEL_OFFSET_PX: f64 = 6.0;

const LABEL_STYLE: TextStyle = TextStyle {
    font: "bold 12px sans-serif",
    fill: [255, 255, 255, 255],
    stroke: [0, 0, 0, 255],
    stroke_width: 3.0,
};

/// Per-draw counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    pub culled: usize,
    /// Visible but missing an avatar, frame or loaded image
    pub skipped: usize,
}

/// Redraws the whole scene from the entity store on every call; nothing is
/// patched between frames.
pub struct Renderer {
    avatar_width: f64,
    map_url: Option<String>,
    assets: AssetCache,
}

impl Renderer {
    pub fn new(avatar_width: f64, map_url: Option<String>) -> Self {
        Self {
            avatar_width,
            map_url,
            assets: AssetCache::new(),
        }
    }

    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetCache {
        &mut self.assets
    }

    pub fn draw(
        &mut self,
        surface: &mut dyn DrawSurface,
        store: &EntityStore,
        camera: &Camera,
    ) -> FrameStats {
        let timer = Timer::new();
        let screen = Rect::new(0.0, 0.0, camera.width(), camera.height());
        surface.clear_rect(screen);

        if let Some(url) = &self.map_url {
            if let Some(map) = self.assets.resolve(&AssetKey::Map, url) {
                let src = Rect::new(
                    camera.viewport_x(),
                    camera.viewport_y(),
                    camera.width(),
                    camera.height(),
                );
                surface.draw_image(map, src, screen);
            }
        }

        let mut stats = FrameStats::default();
        let mut visible: Vec<&Player> = Vec::with_capacity(store.count());
        for player in store.players() {
            if camera.is_visible(player.x, player.y, self.avatar_width) {
                visible.push(player);
            } else {
                stats.culled += 1;
            }
        }
        // Lower on screen draws later, so it overlaps what is behind it
        visible.sort_by(|a, b| a.y.total_cmp(&b.y).then_with(|| a.id.cmp(&b.id)));

        for player in visible {
            if draw_player(
                surface,
                &mut self.assets,
                store,
                camera,
                player,
                self.avatar_width,
            ) {
                stats.drawn += 1;
            } else {
                stats.skipped += 1;
            }
        }

        trace!(
            drawn = stats.drawn,
            culled = stats.culled,
            skipped = stats.skipped,
            micros = timer.elapsed_micros(),
            "Scene drawn"
        );
        stats
    }
}

/// Left-facing sprites reuse the right-facing frames, mirrored
fn frame_source(facing: Direction) -> (Direction, bool) {
    match facing {
        Direction::Left => (Direction::Right, true),
        other => (other, false),
    }
}

fn draw_player(
    surface: &mut dyn DrawSurface,
    assets: &mut AssetCache,
    store: &EntityStore,
    camera: &Camera,
    player: &Player,
    avatar_width: f64,
) -> bool {
    let Some(avatar) = store.avatar(&player.avatar) else {
        return false;
    };
    let (facing, mirrored) = frame_source(player.facing);
    let Some(url) = avatar
        .frames
        .get(&facing)
        .and_then(|frames| frames.get(player.animation_frame))
    else {
        return false;
    };
    let key = AssetKey::Frame {
        avatar: avatar.name.clone(),
        facing,
        frame: player.animation_frame,
    };
    let Some(image) = assets.resolve(&key, url) else {
        return false;
    };
    if image.width == 0 {
        return false;
    }

    let width = avatar_width;
    let height = width * f64::from(image.height) / f64::from(image.width);
    let (sx, sy) = camera.world_to_screen(player.x, player.y);
    let left = sx - width / 2.0;
    let top = sy - height;
    let src = Rect::new(0.0, 0.0, f64::from(image.width), f64::from(image.height));

    if mirrored {
        surface.save();
        surface.scale(-1.0, 1.0);
        surface.draw_image(image, src, Rect::new(-(left + width), top, width, height));
        surface.restore();
    } else {
        surface.draw_image(image, src, Rect::new(left, top, width, height));
    }

    surface.draw_text(&player.username, sx, top - LABEL_OFFSET_PX, &LABEL_STYLE);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::assets::ImageResource;
    use crate::render::surface::test_support::{DrawOp, RecordingSurface};
    use crate::world::store::test_support::{avatar, player};

    const AVATAR_WIDTH: f64 = 32.0;

    /// Resolve every pending request with a 16x24 image
    fn load_all(renderer: &mut Renderer) {
        for request in renderer.assets_mut().take_requests() {
            let image = ImageResource {
                url: request.url.clone(),
                width: 16,
                height: 24,
            };
            renderer.assets_mut().insert_loaded(request.key, image);
        }
    }

    fn scene(players: Vec<Player>) -> (EntityStore, Camera) {
        let mut store = EntityStore::new();
        for p in players {
            store.upsert_player(p);
        }
        store.upsert_avatar(avatar("knight"));
        (store, Camera::new(800.0, 600.0))
    }

    #[test]
    fn sprite_is_bottom_center_anchored_with_aspect_ratio() {
        let (store, camera) = scene(vec![player("p1", 100.0, 200.0)]);
        let mut renderer = Renderer::new(AVATAR_WIDTH, None);

        let mut first = RecordingSurface::default();
        let stats = renderer.draw(&mut first, &store, &camera);
        assert_eq!(stats.skipped, 1);
        assert!(first.images().is_empty());

        load_all(&mut renderer);
        let mut surface = RecordingSurface::default();
        let stats = renderer.draw(&mut surface, &store, &camera);
        assert_eq!(stats.drawn, 1);
        assert_eq!(
            surface.images(),
            vec![&DrawOp::Image {
                url: "knight/down/0.png".to_string(),
                src: Rect::new(0.0, 0.0, 16.0, 24.0),
                dest: Rect::new(84.0, 152.0, 32.0, 48.0),
            }]
        );
        assert!(surface.ops.contains(&DrawOp::Text {
            text: "user-p1".to_string(),
            x: 100.0,
            y: 146.0,
        }));
    }

    #[test]
    fn left_facing_mirrors_right_frames() {
        let mut p = player("p1", 100.0, 200.0);
        p.facing = Direction::Left;
        p.animation_frame = 1;
        let (store, camera) = scene(vec![p]);
        let mut renderer = Renderer::new(AVATAR_WIDTH, None);
        renderer.draw(&mut RecordingSurface::default(), &store, &camera);
        load_all(&mut renderer);

        let mut surface = RecordingSurface::default();
        renderer.draw(&mut surface, &store, &camera);
        let start = surface
            .ops
            .iter()
            .position(|op| *op == DrawOp::Save)
            .unwrap();
        assert_eq!(
            &surface.ops[start..start + 4],
            &[
                DrawOp::Save,
                DrawOp::Scale(-1.0, 1.0),
                DrawOp::Image {
                    url: "knight/right/1.png".to_string(),
                    src: Rect::new(0.0, 0.0, 16.0, 24.0),
                    dest: Rect::new(-116.0, 152.0, 32.0, 48.0),
                },
                DrawOp::Restore,
            ]
        );
    }

    #[test]
    fn missing_avatar_is_skipped_without_draw() {
        let mut stray = player("p2", 50.0, 50.0);
        stray.avatar = "unknown".to_string();
        let (store, camera) = scene(vec![stray]);
        let mut renderer = Renderer::new(AVATAR_WIDTH, None);

        let mut surface = RecordingSurface::default();
        let stats = renderer.draw(&mut surface, &store, &camera);
        assert_eq!(stats, FrameStats { drawn: 0, culled: 0, skipped: 1 });
        assert!(surface.images().is_empty());
        assert!(surface.texts().is_empty());
        assert!(renderer.assets_mut().take_requests().is_empty());
    }

    #[test]
    fn missing_frame_index_is_skipped() {
        let mut p = player("p1", 50.0, 50.0);
        p.animation_frame = 9;
        let (store, camera) = scene(vec![p]);
        let mut renderer = Renderer::new(AVATAR_WIDTH, None);
        let stats = renderer.draw(&mut RecordingSurface::default(), &store, &camera);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn offscreen_players_are_culled() {
        let (store, camera) = scene(vec![player("near", 10.0, 10.0), player("far", 1500.0, 10.0)]);
        let mut renderer = Renderer::new(AVATAR_WIDTH, None);
        let stats = renderer.draw(&mut RecordingSurface::default(), &store, &camera);
        assert_eq!(stats.culled, 1);
        assert_eq!(renderer.assets_mut().take_requests().len(), 1);
    }

    #[test]
    fn map_is_drawn_from_viewport_rect() {
        let (store, mut camera) = scene(vec![]);
        camera.recenter_on(&player("p1", 1000.0, 1000.0), 800.0, 600.0, 2048.0, 2048.0);
        let mut renderer = Renderer::new(AVATAR_WIDTH, Some("map.png".to_string()));
        renderer.draw(&mut RecordingSurface::default(), &store, &camera);
        load_all(&mut renderer);

        let mut surface = RecordingSurface::default();
        renderer.draw(&mut surface, &store, &camera);
        assert_eq!(surface.ops[0], DrawOp::Clear(Rect::new(0.0, 0.0, 800.0, 600.0)));
        assert_eq!(
            surface.ops[1],
            DrawOp::Image {
                url: "map.png".to_string(),
                src: Rect::new(600.0, 700.0, 800.0, 600.0),
                dest: Rect::new(0.0, 0.0, 800.0, 600.0),
            }
        );
    }

    #[test]
    fn labels_follow_draw_order_by_depth() {
        let (store, camera) = scene(vec![player("b", 100.0, 300.0), player("a", 200.0, 100.0)]);
        let mut renderer = Renderer::new(AVATAR_WIDTH, None);
        renderer.draw(&mut RecordingSurface::default(), &store, &camera);
        load_all(&mut renderer);

        let mut surface = RecordingSurface::default();
        renderer.draw(&mut surface, &store, &camera);
        assert_eq!(surface.texts(), vec!["user-a", "user-b"]);
    }
}

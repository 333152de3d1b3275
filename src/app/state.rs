//! Client composition root
//!
//! Owns every component and routes typed events between them. Each event is
//! handled to completion, including any redraw, before the next one.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::Config;
use crate::input::{InputEvent, InputResolver};
use crate::render::{AssetLoaded, AssetRequest, DrawSurface, FrameStats, Renderer};
use crate::world::{Camera, EntityStore, WorldBounds};
use crate::ws::{ChannelEvent, Session, Update};

pub struct ClientApp<S: DrawSurface> {
    bounds: WorldBounds,
    store: EntityStore,
    camera: Camera,
    input: InputResolver,
    session: Session,
    renderer: Renderer,
    surface: S,
}

impl<S: DrawSurface> ClientApp<S> {
    pub fn new(config: &Config, surface: S, outbound: mpsc::UnboundedSender<String>) -> Self {
        Self {
            bounds: WorldBounds {
                width: config.world_width,
                height: config.world_height,
            },
            store: EntityStore::new(),
            camera: Camera::new(config.viewport_width, config.viewport_height),
            input: InputResolver::new(),
            session: Session::new(config.player_name.clone(), outbound),
            renderer: Renderer::new(config.avatar_width, config.map_url.clone()),
            surface,
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn on_channel(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Open => self.session.on_open(),
            ChannelEvent::Message(text) => {
                let update = self.session.handle_text(&text, &mut self.store);
                self.apply_update(update);
            }
            ChannelEvent::Closed(reason) => self.session.on_closed(&reason),
        }
    }

    /// Returns true when the event was a recognized movement key, so the
    /// host should suppress its default handling
    pub fn on_input(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::KeyDown(code) => {
                let outcome = self.input.key_down(&code);
                if let Some(command) = &outcome.command {
                    self.session.send(command);
                }
                outcome.handled
            }
            InputEvent::KeyUp(code) => {
                let outcome = self.input.key_up(&code);
                if let Some(command) = &outcome.command {
                    self.session.send(command);
                }
                outcome.handled
            }
            InputEvent::Click { x, y } => {
                let (world_x, world_y) = self.camera.screen_to_world(x, y);
                if let Some(command) = self.input.click(world_x, world_y, self.bounds) {
                    self.session.send(&command);
                }
                false
            }
            InputEvent::Resize { width, height } => {
                self.camera
                    .resize(width, height, self.bounds.width, self.bounds.height);
                self.recenter();
                self.redraw();
                false
            }
        }
    }

    pub fn on_asset_loaded(&mut self, loaded: AssetLoaded) {
        if self
            .renderer
            .assets_mut()
            .insert_loaded(loaded.key, loaded.image)
        {
            self.redraw();
        }
    }

    /// Loads the last redraws asked for; the host starts them
    pub fn take_asset_requests(&mut self) -> Vec<AssetRequest> {
        self.renderer.assets_mut().take_requests()
    }

    pub fn redraw(&mut self) -> FrameStats {
        let stats = self
            .renderer
            .draw(&mut self.surface, &self.store, &self.camera);
        self.surface.present();
        stats
    }

    pub fn log_status(&self) {
        info!(
            status = ?self.session.status(),
            player_id = self.session.my_player_id().unwrap_or("-"),
            players = self.store.count(),
            avatars = self.store.avatar_count(),
            images = self.renderer.assets().ready_count(),
            viewport_x = self.camera.viewport_x(),
            viewport_y = self.camera.viewport_y(),
            "Client status"
        );
    }

    fn apply_update(&mut self, update: Update) {
        if let Update::Redraw { recenter } = update {
            if recenter {
                self.recenter();
            }
            self.redraw();
        }
    }

    fn recenter(&mut self) {
        let Some(id) = self.session.my_player_id() else {
            return;
        };
        let Some(me) = self.store.player(id) else {
            debug!(player_id = %id, "Local player not in store, camera unchanged");
            return;
        };
        let (width, height) = (self.camera.width(), self.camera.height());
        self.camera
            .recenter_on(me, width, height, self.bounds.width, self.bounds.height);
    }
}

//! Session protocol: connection lifecycle, join handshake and message dispatch

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::world::EntityStore;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// Connection lifecycle as seen by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Open,
    Closed,
}

/// What the caller must do after a server message was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// Nothing changed
    None,
    /// Tables changed; recenter the camera on the local player first if asked
    Redraw { recenter: bool },
}

/// Client side of the session.
///
/// Outbound commands are serialized here and queued for the writer task.
/// Sends are dropped unless the channel is open.
pub struct Session {
    username: String,
    status: ConnectionStatus,
    my_player_id: Option<String>,
    outbound: mpsc::UnboundedSender<String>,
}

impl Session {
    pub fn new(username: impl Into<String>, outbound: mpsc::UnboundedSender<String>) -> Self {
        Self {
            username: username.into(),
            status: ConnectionStatus::Connecting,
            my_player_id: None,
            outbound,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn my_player_id(&self) -> Option<&str> {
        self.my_player_id.as_deref()
    }

    /// Channel is up: request to join under our display name
    pub fn on_open(&mut self) {
        self.status = ConnectionStatus::Open;
        info!(username = %self.username, "Connection open, joining");
        let join = ClientMsg::JoinGame {
            username: self.username.clone(),
        };
        self.send(&join);
    }

    /// Channel is gone; no reconnection is attempted
    pub fn on_closed(&mut self, reason: &str) {
        if self.status != ConnectionStatus::Closed {
            warn!(reason = %reason, "Connection closed");
        }
        self.status = ConnectionStatus::Closed;
    }

    /// Queue a command for the server. Returns false if it was dropped.
    pub fn send(&self, msg: &ClientMsg) -> bool {
        if self.status != ConnectionStatus::Open {
            debug!(status = ?self.status, ?msg, "Dropping command, connection not open");
            return false;
        }

        let json = match serde_json::to_string(msg) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to encode command");
                return false;
            }
        };

        if self.outbound.send(json).is_err() {
            debug!("Outbound channel closed");
            return false;
        }
        true
    }

    /// Decode one text frame and apply it. Malformed frames are logged and skipped.
    pub fn handle_text(&mut self, text: &str, store: &mut EntityStore) -> Update {
        match serde_json::from_str::<ServerMsg>(text) {
            Ok(msg) => self.apply(msg, store),
            Err(e) => {
                warn!(error = %e, "Failed to parse server message");
                Update::None
            }
        }
    }

    pub fn apply(&mut self, msg: ServerMsg, store: &mut EntityStore) -> Update {
        match msg {
            ServerMsg::JoinGame {
                success,
                player_id,
                players,
                avatars,
            } => {
                if !success {
                    warn!("Join rejected by server");
                    return Update::None;
                }
                let Some(player_id) = player_id else {
                    warn!("Join succeeded without a player id, ignoring");
                    return Update::None;
                };
                if let Some(bound) = &self.my_player_id {
                    warn!(bound = %bound, offered = %player_id, "Already joined, ignoring join result");
                    return Update::None;
                }

                info!(
                    player_id = %player_id,
                    players = players.len(),
                    avatars = avatars.len(),
                    "Joined world"
                );
                self.my_player_id = Some(player_id);
                store.apply_snapshot(players, avatars);
                Update::Redraw { recenter: true }
            }

            ServerMsg::PlayerJoined { player, avatar } => {
                debug!(player_id = %player.id, avatar = %avatar.name, "Player joined");
                store.upsert_player(player);
                if store.upsert_avatar(avatar).is_some() {
                    debug!("Avatar template replaced");
                }
                Update::Redraw { recenter: false }
            }

            ServerMsg::PlayersMoved { players } => {
                let recenter = self
                    .my_player_id
                    .as_ref()
                    .is_some_and(|id| players.contains_key(id));
                store.merge_players(players);
                Update::Redraw { recenter }
            }

            ServerMsg::PlayerLeft { player_id } => {
                debug!(player_id = %player_id, "Player left");
                store.remove_player(&player_id);
                Update::Redraw { recenter: false }
            }

            ServerMsg::Unknown => {
                debug!("Ignoring unknown server message");
                Update::None
            }
        }
    }
}

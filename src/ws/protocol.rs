//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Movement direction, also used as a player's facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Default for Direction {
    fn default() -> Self {
        Self::Down
    }
}

/// Player state as reported by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    #[serde(default)]
    pub username: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub facing: Direction,
    /// Index into the avatar's frame list for the current facing
    #[serde(default)]
    pub animation_frame: usize,
    /// Name of the avatar template this player is drawn with
    #[serde(default)]
    pub avatar: String,
}

/// Shared avatar template: image URLs per facing, one per animation frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub name: String,
    #[serde(default)]
    pub frames: HashMap<Direction, Vec<String>>,
}

/// Body of a move command: relative direction or absolute world target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoveCommand {
    Direction { direction: Direction },
    Position { x: f64, y: f64 },
}

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Request to join the world under a display name
    JoinGame { username: String },

    /// Start or change movement
    Move(MoveCommand),

    /// Stop moving
    Stop,
}

impl ClientMsg {
    pub fn move_direction(direction: Direction) -> Self {
        Self::Move(MoveCommand::Direction { direction })
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        Self::Move(MoveCommand::Position { x, y })
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Result of our join request; carries the full world on success
    #[serde(rename_all = "camelCase")]
    JoinGame {
        success: bool,
        #[serde(default)]
        player_id: Option<String>,
        #[serde(default)]
        players: HashMap<String, Player>,
        #[serde(default)]
        avatars: HashMap<String, Avatar>,
    },

    /// Another player joined, with the avatar they use
    PlayerJoined { player: Player, avatar: Avatar },

    /// Batch of updated players keyed by id
    PlayersMoved { players: HashMap<String, Player> },

    /// Player left the world
    #[serde(rename_all = "camelCase")]
    PlayerLeft { player_id: String },

    /// Any discriminant this client does not know
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outbound_commands_match_wire_shapes() {
        let join = ClientMsg::JoinGame {
            username: "Player".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&join).unwrap(),
            json!({"type": "join_game", "username": "Player"})
        );
        assert_eq!(
            serde_json::to_value(ClientMsg::move_direction(Direction::Left)).unwrap(),
            json!({"type": "move", "direction": "left"})
        );
        assert_eq!(
            serde_json::to_value(ClientMsg::move_to(0.0, 2048.0)).unwrap(),
            json!({"type": "move", "x": 0.0, "y": 2048.0})
        );
        assert_eq!(
            serde_json::to_value(ClientMsg::Stop).unwrap(),
            json!({"type": "stop"})
        );
    }

    #[test]
    fn join_result_decodes_tables() {
        let text = json!({
            "type": "join_game",
            "success": true,
            "playerId": "p1",
            "players": {
                "p1": {"id": "p1", "username": "Ann", "x": 10, "y": 20,
                       "facing": "left", "animationFrame": 2, "avatar": "knight"}
            },
            "avatars": {
                "knight": {"name": "knight", "frames": {"right": ["r0.png", "r1.png"]}}
            }
        })
        .to_string();

        let ServerMsg::JoinGame {
            success,
            player_id,
            players,
            avatars,
        } = serde_json::from_str::<ServerMsg>(&text).unwrap()
        else {
            panic!("expected join result");
        };
        assert!(success);
        assert_eq!(player_id.as_deref(), Some("p1"));
        let p1 = &players["p1"];
        assert_eq!(p1.facing, Direction::Left);
        assert_eq!(p1.animation_frame, 2);
        assert_eq!((p1.x, p1.y), (10.0, 20.0));
        assert_eq!(avatars["knight"].frames[&Direction::Right].len(), 2);
    }

    #[test]
    fn rejected_join_needs_no_tables() {
        let msg: ServerMsg =
            serde_json::from_str(r#"{"type":"join_game","success":false}"#).unwrap();
        assert_eq!(
            msg,
            ServerMsg::JoinGame {
                success: false,
                player_id: None,
                players: HashMap::new(),
                avatars: HashMap::new(),
            }
        );
    }

    #[test]
    fn player_defaults_fill_missing_fields() {
        let player: Player = serde_json::from_str(r#"{"id":"p2","x":1.5,"y":2}"#).unwrap();
        assert_eq!(player.facing, Direction::Down);
        assert_eq!(player.animation_frame, 0);
        assert!(player.avatar.is_empty());
    }

    #[test]
    fn unknown_discriminant_decodes_as_unknown() {
        let msg: ServerMsg = serde_json::from_str(r#"{"type":"weather","rain":true}"#).unwrap();
        assert_eq!(msg, ServerMsg::Unknown);
    }

    #[test]
    fn player_left_uses_camel_case_id() {
        let msg: ServerMsg =
            serde_json::from_str(r#"{"type":"player_left","playerId":"p2"}"#).unwrap();
        assert_eq!(
            msg,
            ServerMsg::PlayerLeft {
                player_id: "p2".to_string()
            }
        );
    }
}

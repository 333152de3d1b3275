//! Server channel: wire protocol, session state and WebSocket transport

pub mod connection;
pub mod protocol;
pub mod session;

pub use connection::{spawn_channel, ChannelEvent};
pub use session::{ConnectionStatus, Session, Update};

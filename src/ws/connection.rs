//! WebSocket client transport
//!
//! Owns the socket and turns it into channel events for the client loop.
//! Outbound frames arrive already serialized from the session.

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Lifecycle and payload events from the channel
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Open,
    Message(String),
    Closed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Spawn the connection task. It always ends with a `Closed` event.
pub fn spawn_channel(
    url: String,
    events: mpsc::UnboundedSender<ChannelEvent>,
    outbound: mpsc::UnboundedReceiver<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let reason = match run_channel(&url, &events, outbound).await {
            Ok(()) => "closed".to_string(),
            Err(e) => {
                error!(url = %url, error = %e, "Channel failed");
                e.to_string()
            }
        };
        let _ = events.send(ChannelEvent::Closed(reason));
    })
}

async fn run_channel(
    url: &str,
    events: &mpsc::UnboundedSender<ChannelEvent>,
    mut outbound: mpsc::UnboundedReceiver<String>,
) -> Result<(), ConnectionError> {
    let (socket, _response) = connect_async(url).await?;
    info!(url = %url, "Connected");

    let (mut ws_sink, mut ws_stream) = socket.split();
    if events.send(ChannelEvent::Open).is_err() {
        return Ok(());
    }

    // Writer task: session commands -> WebSocket
    let writer_handle = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if let Err(e) = ws_sink.send(Message::Text(text)).await {
                debug!(error = %e, "WebSocket send failed");
                break;
            }
        }
        let _ = ws_sink.close().await;
    });

    // Reader loop: WebSocket -> client loop
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if events.send(ChannelEvent::Message(text)).is_err() {
                    debug!("Client loop gone");
                    break;
                }
            }
            Ok(Message::Binary(_)) => {
                warn!("Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) | Ok(Message::Frame(_)) => {
                debug!("Received control frame");
            }
            Ok(Message::Close(frame)) => {
                info!(?frame, "Server initiated close");
                break;
            }
            Err(e) => {
                writer_handle.abort();
                return Err(e.into());
            }
        }
    }

    writer_handle.abort();
    Ok(())
}

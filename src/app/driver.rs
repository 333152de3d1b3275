//! Single-threaded event loop wiring the client to its collaborators

use std::future::Future;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::input::console::{parse_line, ConsoleCommand};
use crate::render::{AssetLoader, HeadlessSurface};
use crate::ws::spawn_channel;

use super::ClientApp;

/// Run the client until `shutdown` resolves or the console asks to quit.
///
/// Channel frames, asset completions and console lines each arrive on their
/// own task; this loop is the only place that touches client state.
pub async fn run(config: Config, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (channel_tx, mut channel_rx) = mpsc::unbounded_channel();
    let (asset_tx, mut asset_rx) = mpsc::unbounded_channel();

    let loader = AssetLoader::new(asset_tx);
    let mut app = ClientApp::new(&config, HeadlessSurface::new(), outbound_tx);
    let channel = spawn_channel(config.server_url.clone(), channel_tx, outbound_rx);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut console_open = true;
    tokio::pin!(shutdown);

    // First frame: requests the map before any player is known
    app.redraw();

    loop {
        for request in app.take_asset_requests() {
            loader.request(request);
        }

        tokio::select! {
            Some(event) = channel_rx.recv() => {
                app.on_channel(event);
            }
            Some(loaded) = asset_rx.recv() => {
                app.on_asset_loaded(loaded);
            }
            line = lines.next_line(), if console_open => match line {
                Ok(Some(line)) => match parse_line(&line) {
                    Ok(Some(ConsoleCommand::Input(event))) => {
                        app.on_input(event);
                    }
                    Ok(Some(ConsoleCommand::Status)) => app.log_status(),
                    Ok(Some(ConsoleCommand::Quit)) => {
                        info!("Quit requested");
                        break;
                    }
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "Ignoring console line"),
                },
                Ok(None) => {
                    info!("Console closed");
                    console_open = false;
                }
                Err(e) => {
                    warn!(error = %e, "Console read failed");
                    console_open = false;
                }
            },
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    channel.abort();
    app.log_status();
    info!(frames = app.surface().frames(), "Client stopped");
    Ok(())
}

//! Hextrap game server.
//!
//! Every WebSocket connection plays its own round against the fleeing token.

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod protocol;
mod server;
mod session;
mod settings;

use server::ServerState;
use settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    info!(
        "Starting Hextrap server ({}x{} grid, {}ms hold)...",
        settings.game.width, settings.game.height, settings.game.hold_duration_ms
    );

    let state = Arc::new(ServerState::new(settings.game));

    server::run_server(settings.addr, state).await
}

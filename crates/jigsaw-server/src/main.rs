//! Jigsaw board server.
//!
//! Hosts one private puzzle per WebSocket connection; the browser shell
//! renders and forwards pointer input as puzzle actions.

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod protocol;
mod server;
mod session;

use config::ServerConfig;
use server::ServerState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    info!(
        rows = config.puzzle.rows,
        columns = config.puzzle.columns,
        piece_size = config.puzzle.piece_size,
        "Starting jigsaw server..."
    );

    let addr = config.addr;
    let state = Arc::new(ServerState::new(config));

    server::run_server(addr, state).await
}

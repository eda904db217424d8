//! mcp-dungeon - dungeon tool server.
//!
//! Loads a dungeon and a player, then serves the dungeon tools as a
//! streamable-HTTP MCP endpoint at `/mcp` with a health check at `/health`.
//!
//! ```bash
//! cargo run -p dungeon-server -- --dungeon-file data/crystal_caverns.yaml --port 9090
//! cargo run -p dungeon-server -- --generate-player --player-file hero.yaml
//! ```

mod cli;
mod mcp;
mod routes;

use anyhow::Context;
use clap::Parser;
use dungeon_core::persist::{self, SAMPLE_PLAYER_FILE};
use dungeon_core::GameSession;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "dungeon_server=info,dungeon_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if args.generate_player {
        let path = args
            .player_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(SAMPLE_PLAYER_FILE));
        persist::generate_player_sample(&path)
            .await
            .with_context(|| format!("failed to write sample player to {}", path.display()))?;
        return Ok(());
    }

    let session = GameSession::load(&args.session_config())
        .await
        .context("failed to load game state")?;
    tracing::info!(dungeon = %session.dungeon().name, "Game session ready");

    let app = routes::router(Arc::new(session));

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", args.host, args.port))?;
    tracing::info!("MCP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

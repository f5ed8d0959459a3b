//! Archmap server binary.

use anyhow::{Context, Result};
use archmap_server::cli::Cli;
use archmap_server::{AppState, create_router};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Example: RUST_LOG=archmap=debug,tower_http=debug archmap-server
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("archmap=info,archmap_server=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli
        .resolve_config()
        .await
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    let (state, _warnings) = AppState::load(&config)
        .await
        .with_context(|| format!("Failed to load graph from {}", config.data_file.display()))?;

    let listener = TcpListener::bind(config.bind.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    tracing::info!(address = %config.bind, "Starting archmap-server");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

//! seisreport - Land-seismic crew reporting service
//!
//! Stores daily crew report records in an embedded store and serves
//! day / week / month / project rollups over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (./data/seisreport, port 8090)
//! cargo run --release
//!
//! # Seed a demo project first
//! cargo run --release --bin seed-demo
//!
//! # Point at a specific config and data directory
//! cargo run --release -- --config crew_config.toml --data-dir /var/lib/seisreport
//! ```
//!
//! # Environment Variables
//!
//! - `SEISREPORT_CONFIG`: Path to the crew config TOML
//! - `SEISREPORT_CORS_ORIGINS`: Comma-separated allowed CORS origins
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use seisreport::api::{create_app, DashboardState};
use seisreport::config::{self, CrewConfig};
use seisreport::storage::ReportStore;

#[derive(Parser, Debug)]
#[command(name = "seisreport", about = "Land-seismic crew reporting service")]
struct CliArgs {
    /// Path to the crew config TOML (overrides the search order)
    #[arg(long, env = "SEISREPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Record store directory (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Bind address (overrides the config file)
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let crew_config = match &args.config {
        Some(path) => CrewConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => CrewConfig::load(),
    };

    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| crew_config.storage.data_dir.clone());
    let server_addr = args.bind.unwrap_or_else(|| {
        SocketAddr::new(crew_config.server.bind_address, crew_config.server.port)
    });

    info!(crew = %crew_config.crew.name, "Starting seisreport");
    config::init(crew_config);

    let store = ReportStore::open(&data_dir)
        .with_context(|| format!("Failed to open record store at {}", data_dir.display()))?;
    let store = Arc::new(store);

    let app = create_app(DashboardState {
        store: Arc::clone(&store),
    });

    let listener = tokio::net::TcpListener::bind(server_addr)
        .await
        .with_context(|| format!("Failed to bind to {server_addr}"))?;
    info!("HTTP server listening on {server_addr}");

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, initiating shutdown...");
            shutdown_token.cancel();
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await
        .context("HTTP server error")?;

    store.flush().context("Failed to flush record store")?;
    info!("seisreport shutdown complete");
    Ok(())
}

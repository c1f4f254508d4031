//! Longbox Web - Main entry point
//!
//! Serves the JSON API and the generated HTML browsing site over the
//! artifact set written by `longbox-ingest convert`.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use longbox_common::config;
use longbox_web::store::Store;
use longbox_web::{build_router, AppState};

/// Command-line arguments for longbox-web
#[derive(Parser, Debug)]
#[command(name = "longbox-web")]
#[command(about = "Reading-order browsing server for Longbox")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5780", env = "LONGBOX_WEB_PORT")]
    port: u16,

    /// Directory holding the JSON artifacts
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "longbox_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let data_dir = config::resolve_data_dir(args.data_dir.as_deref());
    info!("Data directory: {}", data_dir.display());

    let store = Store::load(&data_dir).context("Failed to load artifacts")?;
    info!(comics = store.comic_count(), "store loaded");

    let app = build_router(AppState::new(store));
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("longbox-web listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

//! repertorio-api - song repertoire CRUD service
//!
//! Serves the collection stored in a JSON document over HTTP (port 3000 by
//! default).

use anyhow::{Context, Result};
use clap::Parser;
use repertorio_common::config::{load_config, ConfigOverrides};
use repertorio_common::JsonFileStore;
use repertorio_api::{build_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for repertorio-api
#[derive(Parser, Debug)]
#[command(name = "repertorio-api")]
#[command(about = "Song repertoire CRUD service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "REPERTORIO_PORT")]
    port: Option<u16>,

    /// Interface to bind
    #[arg(long = "bind", env = "REPERTORIO_BIND")]
    bind_address: Option<String>,

    /// JSON document holding the songs
    #[arg(short, long, env = "REPERTORIO_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// HTML page served at `/`
    #[arg(long, env = "REPERTORIO_INDEX_PAGE")]
    index_page: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, env = "REPERTORIO_LOG_LEVEL")]
    log_level: Option<String>,

    /// TOML config file
    #[arg(short, long, env = "REPERTORIO_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let overrides = ConfigOverrides {
        port: args.port,
        bind_address: args.bind_address,
        data_file: args.data_file,
        index_page: args.index_page,
        log_level: args.log_level,
    };
    let config = load_config(args.config.as_deref(), overrides)
        .context("Failed to load configuration")?;

    let level = &config.log_level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("repertorio_api={level},repertorio_common={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting repertorio-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config.source {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No config file found, using defaults"),
    }
    info!("Data file: {}", config.data_file.display());
    info!("Landing page: {}", config.index_page.display());

    let store = Arc::new(JsonFileStore::new(config.data_file.clone()));
    let state = AppState::new(store, config.index_page.clone());
    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Servidor escuchando en el puerto {}", config.port);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

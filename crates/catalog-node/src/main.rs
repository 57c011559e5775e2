//! Catalog Node - HTTP server for the asset catalog.

use anyhow::Context;
use catalog_node::{
    create_router, observability::init_logging, open_store, AppState, LogFormat, NodeConfig,
    StoreKind,
};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Catalog Node - browse, search and download catalog assets
#[derive(Parser, Debug)]
#[command(name = "catalog-node")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP listen address
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Data store (rest, memory)
    #[arg(long)]
    store: Option<StoreKind>,

    /// Backend project URL for the rest store
    #[arg(long)]
    backend_url: Option<String>,

    /// Backend API key for the rest store
    #[arg(long, env = "CATALOG_BACKEND_KEY", hide_env_values = true)]
    backend_key: Option<String>,

    /// Seed fixture (JSON or YAML) for the memory store
    #[arg(long)]
    seed: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => NodeConfig::load(path)?,
            None => NodeConfig::default(),
        };

        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(kind) = self.store {
            config.store.kind = kind;
        }
        if let Some(url) = self.backend_url {
            config.store.url = Some(url);
        }
        if let Some(key) = self.backend_key {
            config.store.api_key = Some(key);
        }
        if let Some(seed) = self.seed {
            config.store.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Args::parse().into_config()?;

    init_logging(&config.log_level, config.log_format);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting catalog node");
    tracing::info!(
        listen = %config.listen,
        store = %config.store.kind,
        "Node configuration"
    );

    let store = open_store(&config.store).context("failed to open data store")?;
    let app = create_router(AppState::new(store, config.store.kind));

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    tracing::info!(addr = %config.listen, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Catalog node stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

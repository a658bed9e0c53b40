//! Stormer (v1)
//!
//! An HTTP service that sends arbitrary requests on behalf of a client and
//! reports back what happened.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──POST /api/execute──▶ http::handlers
//!                                        │
//!                                        ▼
//!                         execute::normalize (pure)
//!                                        │
//!                                        ▼
//!                         execute::executor ────────▶ Target server
//!                                        │
//!                                        ▼
//!                         execute::envelope ──▶ store::history (on success)
//!                                        │
//!     Client ◀───────── JSON envelope ───┘
//!
//!     Cross-cutting: config (+ hot reload), observability, lifecycle
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use stormer::config::{load_config, ConfigWatcher, StormerConfig};
use stormer::lifecycle::{spawn_signal_handler, Shutdown};
use stormer::observability::{logging, metrics};
use stormer::{HttpServer, Stores};

#[derive(Parser)]
#[command(name = "stormer", version, about = "API request execution service")]
struct Args {
    /// Path to a TOML config file; watched for changes
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => StormerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "stormer starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        history_capacity = config.history.capacity,
        request_timeout_secs = config.executor.request_timeout_secs,
        persistence_dir = ?config.storage.persistence_dir,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let stores = Stores::open(&config.storage, &config.history)?;

    // The watcher stops when dropped, so hold it for the life of the server.
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            (rx, Some(watcher.run()?))
        }
        None => (mpsc::unbounded_channel().1, None),
    };

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, stores.clone())?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    if let Err(e) = stores.persist().await {
        tracing::error!(error = %e, "Failed to persist stores");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

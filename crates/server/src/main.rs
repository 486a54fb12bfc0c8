use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinefetch_core::downloader::{DownloadClient, QBittorrentClient};
use cinefetch_core::events::{EventStore, SqliteEventStore};
use cinefetch_core::indexer::{IndexerClient, JackettClient};
use cinefetch_core::library::{MovieStore, SqliteMovieStore};
use cinefetch_core::{
    load_config, validate_config, JobScheduler, SanitizedConfig, SearchOrchestrator,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("cinefetch {} starting", VERSION);

    // Determine config path
    let config_path = std::env::var("CINEFETCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        "Effective config: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );

    // Log a hash of the effective config so runs are attributable
    // without leaking secrets.
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!("Config hash: {}", &config_hash[..16]);

    // Register core metrics in the default registry.
    for metric in cinefetch_core::metrics::all_metrics() {
        if let Err(e) = prometheus::default_registry().register(metric) {
            warn!("Failed to register metric: {}", e);
        }
    }

    // Stores
    let movies: Arc<dyn MovieStore> = Arc::new(
        SqliteMovieStore::new(&config.database.path).context("Failed to create movie store")?,
    );
    info!("Movie store initialized");

    let events: Arc<dyn EventStore> = Arc::new(
        SqliteEventStore::new(&config.database.path).context("Failed to create event store")?,
    );
    info!("Event store initialized");

    // External clients
    info!("Initializing Jackett client at {}", config.jackett.url);
    let indexer: Arc<dyn IndexerClient> = Arc::new(
        JackettClient::new(config.jackett.clone()).context("Failed to create Jackett client")?,
    );

    let downloader: Option<Arc<dyn DownloadClient>> = match &config.qbittorrent {
        Some(qbt_config) => {
            info!("Initializing qBittorrent client at {}", qbt_config.url);
            Some(Arc::new(
                QBittorrentClient::new(qbt_config.clone())
                    .context("Failed to create qBittorrent client")?,
            ))
        }
        None => {
            info!("No download client configured; searches stop at candidate selection");
            None
        }
    };

    // Orchestrator and scheduler
    let orchestrator = Arc::new(SearchOrchestrator::new(
        Arc::clone(&movies),
        Arc::clone(&events),
        indexer,
        downloader,
        Duration::from_secs(config.scheduler.search_delay_secs),
    ));

    let scheduler = Arc::new(JobScheduler::new(
        orchestrator,
        movies,
        events,
        config.scheduler.clone(),
    ));

    scheduler.start();
    info!("Job scheduler started");

    // Run until interrupted
    signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    scheduler.stop().await;
    info!("cinefetch stopped");

    Ok(())
}

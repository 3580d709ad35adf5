mod api;
mod catalog;
mod config;
mod deployment;
mod error;
mod ledger;
mod satellite;
mod service;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use deployment::Deployer;
use ledger::SyntheticLedger;
use satellite::LiveAdapter;
use service::SentinelService;

#[derive(Parser)]
#[command(name = "ecogrid-sentinel")]
#[command(about = "Sensor and relay deployment planning for forest-monitoring grids")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the HTTP bind address
    #[arg(short, long)]
    bind: Option<String>,

    /// Never contact the live analysis provider
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config from {:?}: {}", cli.config, e);
        eprintln!("Using default configuration");
        config::Config::default()
    });

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("EcoGrid Sentinel v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!("Forest sensor & relay deployment planner");
    info!("===========================================");

    // Already validated by Config::load; defaults never carry regions
    let catalog = config.catalog()?;
    info!("Region catalog loaded: {} regions", catalog.len());

    // Live analysis is decided once; a failed init means precomputed-only
    let live_config = if cli.offline { None } else { config.live.as_ref() };
    let live = LiveAdapter::initialize(live_config).await;
    let live_timeout = Duration::from_secs(config.live.as_ref().map_or(30, |l| l.timeout_secs));

    let deployer = Deployer::new(
        Arc::new(catalog),
        config.planner.clone(),
        live,
        live_timeout,
    );
    let ledger = SyntheticLedger::new(config.ledger.genesis_height);
    let service = Arc::new(SentinelService::new(deployer, Box::new(ledger)));

    info!(
        "Mode: {}",
        if service.live_enabled() {
            "live analysis + precomputed fallback"
        } else {
            "precomputed only"
        }
    );

    let bind = cli.bind.unwrap_or(config.server.bind);
    info!("Sentinel running. Press Ctrl+C to stop.");

    tokio::select! {
        result = api::run_server(&bind, service) => {
            if let Err(e) = &result {
                error!("HTTP server failed: {}", e);
            }
            result?;
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutting down...");
        }
    }

    Ok(())
}

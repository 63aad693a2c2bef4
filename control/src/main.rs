use anyhow::{Context, Result};
use clap::Parser;
use ipmanager_engine::{IpService, MemoryCache};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ipmanager_control::config::{default_config_path, Config};
use ipmanager_control::services::cache_sweeper;
use ipmanager_control::{create_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "ipmanager-control")]
#[command(about = "Static address allocation with release cooldown", long_about = None)]
struct Args {
    /// Config file (TOML)
    #[arg(long, env = "IPMANAGER_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address for HTTP server
    #[arg(long, env = "IPMANAGER_BIND", default_value = "0.0.0.0:8080")]
    bind: String,

    /// Override the configured cooldown window
    #[arg(long, env = "IPMANAGER_COOLDOWN_MINUTES")]
    cooldown_minutes: Option<u32>,

    /// How often expired cooldown entries are dropped
    #[arg(long, default_value_t = 60)]
    sweep_interval_secs: u64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting IP manager");

    // Load configuration
    let config_path = args.config.unwrap_or_else(default_config_path);
    let mut config = Config::load(&config_path)?;
    if let Some(minutes) = args.cooldown_minutes {
        config.ip.cooldown_minutes = minutes;
    }

    info!(
        "Loaded {} group(s) and {} network(s) from {:?}, cooldown {} min",
        config.ip.groups.len(),
        config.ip.networks.len(),
        config_path,
        config.ip.cooldown_minutes
    );

    // Cooldown cache and its sweeper
    let cache = Arc::new(MemoryCache::new());
    let sweep_interval = Duration::from_secs(args.sweep_interval_secs.max(1));
    tokio::spawn(cache_sweeper(cache.clone(), sweep_interval));

    let state = Arc::new(AppState {
        ip_service: IpService::new(config.ip, cache),
    });

    // Create router
    let app = create_router(state);

    // Parse bind address
    let addr: SocketAddr = args.bind.parse().context("Invalid bind address")?;
    info!("Listening on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

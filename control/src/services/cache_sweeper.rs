use ipmanager_engine::MemoryCache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Background task that drops expired cooldown entries from the in-memory cache
pub async fn cache_sweeper(cache: Arc<MemoryCache>, interval: Duration) {
    info!("Starting cooldown cache sweeper (every {:?})", interval);

    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        sweep_once(&cache).await;
    }
}

pub async fn sweep_once(cache: &MemoryCache) -> usize {
    let evicted = cache.evict_expired().await;
    if evicted > 0 {
        info!("Evicted {} expired cooldown entries", evicted);
    } else {
        debug!("No expired cooldown entries");
    }
    evicted
}

use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tracing::{debug, error, info};

use crate::cache::CooldownCache;
use crate::error::Result;

/// Keeps released addresses out of circulation for a fixed window.
///
/// A cache entry's presence is the whole signal; its TTL ends the cooldown.
#[derive(Clone)]
pub struct CooldownManager {
    cache: Arc<dyn CooldownCache>,
    namespace: String,
    cooldown: Duration,
}

impl CooldownManager {
    pub fn new(cache: Arc<dyn CooldownCache>, namespace: &str, cooldown_minutes: u32) -> Self {
        Self {
            cache,
            namespace: namespace.to_string(),
            cooldown: Duration::minutes(i64::from(cooldown_minutes)),
        }
    }

    pub fn cooldown_key(&self, address: &str) -> String {
        format!("{}.IpCooldown.{}", self.namespace, address)
    }

    /// Check whether an address was released recently.
    ///
    /// Cache failures are returned to the caller; an outage never reads as "free".
    pub async fn is_in_cooldown(&self, address: &str) -> Result<bool> {
        let cached = self.cache.get(&self.cooldown_key(address)).await?;
        Ok(cached.is_some())
    }

    /// Put an address into cooldown. Best-effort: errors are logged, not returned.
    pub async fn release(&self, address: &str) {
        let address = address.trim();
        if address.is_empty() {
            return;
        }

        if let Err(e) = self.try_release(address).await {
            error!("Failed to put {} into cooldown: {}", address, e);
        }
    }

    async fn try_release(&self, address: &str) -> Result<()> {
        let key = self.cooldown_key(address);

        // Releasing twice must not push the expiration out
        if self.cache.get(&key).await?.is_some() {
            debug!("{} already in cooldown", address);
            return Ok(());
        }

        let expires_at = OffsetDateTime::now_utc() + self.cooldown;
        self.cache
            .set(&key, address.as_bytes().to_vec(), expires_at)
            .await?;

        info!("{} in cooldown until {}", address, expires_at);
        Ok(())
    }
}

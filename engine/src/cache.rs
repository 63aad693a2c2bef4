use async_trait::async_trait;
use std::collections::HashMap;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::error::CacheError;

/// Key/value store with per-entry absolute expiration.
///
/// Only presence matters to the allocator; values are opaque bytes.
#[async_trait]
pub trait CooldownCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        expires_at: OffsetDateTime,
    ) -> Result<(), CacheError>;
}

struct Entry {
    value: Vec<u8>,
    expires_at: OffsetDateTime,
}

impl Entry {
    fn is_live(&self, now: OffsetDateTime) -> bool {
        self.expires_at > now
    }
}

/// In-process cache used when no external cache is configured
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Drop every expired entry, returning how many were removed
    pub async fn evict_expired(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    /// Number of entries that have not expired yet
    pub async fn len(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let entries = self.entries.read().await;
        entries.values().filter(|e| e.is_live(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CooldownCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let entries = self.entries.read().await;
        let now = OffsetDateTime::now_utc();

        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        expires_at: OffsetDateTime,
    ) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }
}

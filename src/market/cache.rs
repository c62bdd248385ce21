//! Short-lived response cache for quote lookups, backed by moka.
//!
//! Entries expire a fixed TTL after they are stored and the cache holds at
//! most `capacity` entries, evicting the least recently used ones first.
//! Reads never refresh the TTL. Capacity eviction runs during moka's
//! maintenance, so the bound can be briefly exceeded between inserts.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use moka::policy::EvictionPolicy;
use moka::notification::RemovalCause;
use tracing::debug;

use crate::market::model::QuoteRecord;

#[derive(Clone)]
pub struct QuoteCache {
    cache: Cache<String, QuoteRecord>,
    capacity: u64,
}

impl QuoteCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let capacity = capacity.max(1) as u64;
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru())
            .eviction_listener(|key: Arc<String>, _value, cause| {
                if cause == RemovalCause::Size {
                    debug!(key = %key, "Evicted least recently used cache entry");
                }
            })
            .build();

        Self { cache, capacity }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Returns the stored record if it has not expired.
    pub async fn get(&self, key: &str) -> Option<QuoteRecord> {
        self.cache.get(key).await
    }

    /// Stores `value` under `key`, replacing any previous entry and
    /// restarting its TTL.
    pub async fn insert(&self, key: impl Into<String>, value: QuoteRecord) {
        self.cache.insert(key.into(), value).await;
    }

    /// Entry count after pending evictions and expirations are applied.
    pub async fn len(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    /// Applies moka's buffered reads, writes and evictions now.
    pub async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }
}

//! In-memory implementation of the PageCache trait. Entries live in a
//! sharded concurrent map, so lookups and writes on different keys do not
//! contend; counters are per-instance atomics.
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::entry::DEFAULT_TTL;
use crate::stats::StatsCounters;
use crate::store::validate_key;
use crate::{CacheEntry, CacheError, CacheLookup, CacheStats, PageCache};

pub struct InMemoryPageCache {
    entries: DashMap<String, CacheEntry>,
    default_ttl: Duration,
    counters: StatsCounters,
}

impl InMemoryPageCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
            counters: StatsCounters::default(),
        }
    }
}

impl Default for InMemoryPageCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageCache for InMemoryPageCache {
    async fn get(&self, key: &str) -> Result<CacheLookup, CacheError> {
        validate_key(key)?;

        let Some(mut entry) = self.entries.get_mut(key) else {
            self.counters.record_miss();
            return Ok(CacheLookup::Miss);
        };

        if entry.is_stale() {
            self.counters.record_miss();
            debug!("Cache entry is stale for key: {}", key);
            return Ok(CacheLookup::Stale(entry.clone()));
        }

        entry.hit_count += 1;
        self.counters.record_hit();
        debug!("Cache hit for key: {}", key);
        Ok(CacheLookup::Fresh(entry.clone()))
    }

    async fn put(
        &self,
        key: &str,
        payload: &[u8],
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        validate_key(key)?;
        let entry =
            CacheEntry::new(key, payload, ttl.unwrap_or(self.default_ttl))?;
        self.entries.insert(key.to_string(), entry);
        debug!("Cached payload for key: {}", key);
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> Result<bool, CacheError> {
        validate_key(key)?;
        Ok(self.entries.remove(key).is_some())
    }

    async fn evict_stale(&self) -> Result<u64, CacheError> {
        let now = Utc::now();
        let stale_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|item| item.value().is_stale_at(now))
            .map(|item| item.key().clone())
            .collect();

        let mut removed = 0u64;
        for key in stale_keys {
            // Re-check under the shard lock so a racing fresh put survives.
            if self
                .entries
                .remove_if(&key, |_, entry| entry.is_stale_at(now))
                .is_some()
            {
                removed += 1;
            }
        }

        self.counters.record_evictions(removed);
        if removed > 0 {
            info!("Evicted {} stale cache entries", removed);
        }
        Ok(removed)
    }

    async fn contains(&self, key: &str) -> Result<bool, CacheError> {
        validate_key(key)?;
        Ok(self.entries.contains_key(key))
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        Ok(self.counters.snapshot(self.entries.len() as u64))
    }

    fn reset_stats(&self) {
        self.counters.reset();
    }
}

impl std::fmt::Debug for InMemoryPageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryPageCache")
            .field("entries", &self.entries.len())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

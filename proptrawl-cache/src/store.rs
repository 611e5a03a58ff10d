use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::{CacheEntry, CacheError, CacheStats};

/// Outcome of a cache lookup.
///
/// Stale entries are handed back rather than swallowed so callers can decide
/// to reuse expired data, e.g. when a live refetch fails.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// No entry exists for the key
    Miss,
    /// An entry exists but its TTL has elapsed; counted as a miss
    Stale(CacheEntry),
    /// A live entry; its hit count has already been incremented
    Fresh(CacheEntry),
}

impl CacheLookup {
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Miss)
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale(_))
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }

    /// The entry, whether fresh or stale.
    pub fn entry(&self) -> Option<&CacheEntry> {
        match self {
            Self::Miss => None,
            Self::Stale(entry) | Self::Fresh(entry) => Some(entry),
        }
    }
}

/// Core page cache trait that backends must implement.
///
/// One persisted copy per fingerprint, lazy staleness detection at read
/// time, per-instance hit/miss/eviction accounting. Nothing here runs on a
/// timer; eviction only happens when a caller asks for it.
#[async_trait]
pub trait PageCache: Send + Sync {
    /// Look up a fingerprint.
    ///
    /// Exactly one counter moves per call: the hit counter on a fresh entry,
    /// the miss counter otherwise. A stale entry never bumps its own
    /// `hit_count`.
    async fn get(&self, key: &str) -> Result<CacheLookup, CacheError>;

    /// Create or replace the entry for a fingerprint.
    ///
    /// Replacement resets `created_at` and `hit_count`. `ttl` falls back to
    /// the store-wide default when `None`. Overwriting is not an error.
    async fn put(
        &self,
        key: &str,
        payload: &[u8],
        ttl: Option<Duration>,
    ) -> Result<(), CacheError>;

    /// Remove one entry regardless of staleness; returns whether it existed.
    async fn invalidate(&self, key: &str) -> Result<bool, CacheError>;

    /// Remove every entry that is stale at call time and return the count.
    async fn evict_stale(&self) -> Result<u64, CacheError>;

    /// Whether an entry exists for the key, staleness not considered.
    async fn contains(&self, key: &str) -> Result<bool, CacheError>;

    /// Snapshot of entry count and running counters.
    async fn stats(&self) -> Result<CacheStats, CacheError>;

    /// Zero the hit/miss/eviction counters without touching entries.
    fn reset_stats(&self);
}

pub type SharedPageCache = Arc<dyn PageCache + Send + Sync>;

pub(crate) fn validate_key(key: &str) -> Result<(), CacheError> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key must not be empty".to_string()));
    }
    Ok(())
}

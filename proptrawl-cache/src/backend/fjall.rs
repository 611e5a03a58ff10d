use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use fjall::{
    Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode,
};
use tracing::{debug, info};

use crate::entry::DEFAULT_TTL;
use crate::stats::StatsCounters;
use crate::store::validate_key;
use crate::{CacheEntry, CacheError, CacheLookup, CacheStats, PageCache};

const LOCK_STRIPES: usize = 64;

/// Key-striped locks: same-key read-modify-write is serialized, operations
/// on different keys land on different stripes and do not contend.
struct KeyLocks {
    stripes: Vec<Mutex<()>>,
}

impl KeyLocks {
    fn new(count: usize) -> Self {
        Self {
            stripes: (0..count).map(|_| Mutex::new(())).collect(),
        }
    }

    fn lock(&self, key: &str) -> MutexGuard<'_, ()> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let index = (hasher.finish() as usize) % self.stripes.len();
        self.stripes[index].lock().unwrap()
    }
}

/// Fjall-backed page cache (persistent backend).
///
/// Layout:
/// - `pages`: fingerprint -> JSON-encoded [`CacheEntry`]
///
/// Hit/miss/eviction counters are process-local: after a restart they start
/// from zero while the entry count is recomputed from the keyspace.
pub struct FjallPageCache {
    db: Keyspace,
    pages: PartitionHandle,
    default_ttl: Duration,
    counters: StatsCounters,
    locks: KeyLocks,
}

impl FjallPageCache {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        Self::open_with_ttl(path, DEFAULT_TTL)
    }

    pub fn open_with_ttl(
        path: impl AsRef<Path>,
        default_ttl: Duration,
    ) -> Result<Self, CacheError> {
        let keyspace = Config::new(path).open()?;
        let pages = keyspace
            .open_partition("pages", PartitionCreateOptions::default())?;
        info!("Opened page cache with {} entries", pages.len()?);

        Ok(Self {
            db: keyspace,
            pages,
            default_ttl,
            counters: StatsCounters::default(),
            locks: KeyLocks::new(LOCK_STRIPES),
        })
    }

    fn encode(entry: &CacheEntry) -> Result<Vec<u8>, CacheError> {
        serde_json::to_vec(entry)
            .map_err(|e| CacheError::Serialization(e.to_string()))
    }

    fn decode(bytes: &[u8]) -> Result<CacheEntry, CacheError> {
        serde_json::from_slice(bytes)
            .map_err(|e| CacheError::Deserialization(e.to_string()))
    }
}

#[async_trait]
impl PageCache for FjallPageCache {
    async fn get(&self, key: &str) -> Result<CacheLookup, CacheError> {
        validate_key(key)?;
        let _guard = self.locks.lock(key);

        let Some(bytes) = self.pages.get(key)? else {
            self.counters.record_miss();
            return Ok(CacheLookup::Miss);
        };

        let mut entry = Self::decode(&bytes)?;
        if entry.is_stale() {
            self.counters.record_miss();
            debug!("Cache entry is stale for key: {}", key);
            return Ok(CacheLookup::Stale(entry));
        }

        entry.hit_count += 1;
        self.pages.insert(key, Self::encode(&entry)?)?;
        self.counters.record_hit();
        debug!("Cache hit for key: {}", key);
        Ok(CacheLookup::Fresh(entry))
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
        let bytes = Self::encode(&entry)?;

        let _guard = self.locks.lock(key);
        self.pages.insert(key, bytes)?;
        // Best-effort sync to disk for durability.
        self.db.persist(PersistMode::SyncAll)?;
        debug!("Cached payload for key: {}", key);
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> Result<bool, CacheError> {
        validate_key(key)?;
        let _guard = self.locks.lock(key);

        let existed = self.pages.contains_key(key)?;
        if existed {
            self.pages.remove(key)?;
            self.db.persist(PersistMode::SyncAll)?;
        }
        Ok(existed)
    }

    async fn evict_stale(&self) -> Result<u64, CacheError> {
        let now = Utc::now();

        let mut stale_keys = Vec::new();
        for item in self.pages.iter() {
            let (key_bytes, value_bytes) = item?;
            if Self::decode(&value_bytes)?.is_stale_at(now) {
                stale_keys.push(key_bytes);
            }
        }

        let mut removed = 0u64;
        for key_bytes in stale_keys {
            let key = String::from_utf8_lossy(&key_bytes).into_owned();
            let _guard = self.locks.lock(&key);

            // Re-read under the key's stripe so a racing fresh put survives.
            let Some(bytes) = self.pages.get(&key_bytes)? else {
                continue;
            };
            if Self::decode(&bytes)?.is_stale_at(now) {
                self.pages.remove(&*key_bytes)?;
                removed += 1;
            }
        }

        self.db.persist(PersistMode::SyncAll)?;
        self.counters.record_evictions(removed);
        if removed > 0 {
            info!("Evicted {} stale cache entries", removed);
        }
        Ok(removed)
    }

    async fn contains(&self, key: &str) -> Result<bool, CacheError> {
        validate_key(key)?;
        Ok(self.pages.contains_key(key)?)
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        let entries = self.pages.len()? as u64;
        Ok(self.counters.snapshot(entries))
    }

    fn reset_stats(&self) {
        self.counters.reset();
    }
}

impl std::fmt::Debug for FjallPageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FjallPageCache")
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

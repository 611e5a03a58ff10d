//! TTL page cache for web crawlers.
//!
//! Maps a request fingerprint to a previously fetched result, with
//! time-based expiry, hit/miss accounting and explicit eviction of stale
//! entries. Trait-based API with pluggable backends:
//! - In-memory (always available)
//! - Fjall, an embedded keyspace on local disk (with the "fjall" feature,
//!   enabled by default)
//!
//! Staleness is detected lazily at read time; nothing in the store runs on a
//! timer. Callers that want to reclaim storage trigger
//! [`PageCache::evict_stale`] themselves, e.g. from a periodic maintenance
//! job. Stale entries are still handed back (marked as such) so callers can
//! fall back to them when a live refetch fails.

mod backend;
mod entry;
mod error;
mod fingerprint;
mod serializers;
mod stats;
mod store;

#[cfg(feature = "fjall")]
pub use backend::FjallPageCache;
pub use backend::InMemoryPageCache;
pub use entry::{CacheEntry, PagePayload, DEFAULT_TTL};
pub use error::CacheError;
pub use fingerprint::fingerprint;
pub use serializers::{JsonSerializer, PayloadSerializer};
pub use stats::CacheStats;
pub use store::{CacheLookup, PageCache, SharedPageCache};

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CacheError;

/// Store-wide default time-to-live for cached pages.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Page payload for HTTP-driven scrapers.
///
/// One ready-made payload shape; the store itself only ever sees the bytes
/// produced by a [`PayloadSerializer`](crate::PayloadSerializer).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PagePayload {
    /// The URL this page was fetched from
    pub url: String,
    /// HTTP response status code
    pub status: u16,
    /// The HTTP response body
    pub body: String,
    /// HTTP response headers
    pub headers: HashMap<String, String>,
    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}

/// A cached entry: one fingerprint, one opaque payload blob, one TTL window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    /// Unique fingerprint identifying the request
    pub key: String,
    /// Opaque serialized payload, encoding owned by the caller
    pub payload: Vec<u8>,
    /// When this entry was written
    pub created_at: DateTime<Utc>,
    /// When this entry turns stale
    pub expires_at: DateTime<Utc>,
    /// Number of fresh lookups served by this entry since creation
    pub hit_count: u64,
}

impl CacheEntry {
    pub(crate) fn new(
        key: &str,
        payload: &[u8],
        ttl: Duration,
    ) -> Result<Self, CacheError> {
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtl(
                "must be greater than zero".to_string(),
            ));
        }
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| CacheError::InvalidTtl(e.to_string()))?;
        let created_at = Utc::now();
        Ok(Self {
            key: key.to_string(),
            payload: payload.to_vec(),
            created_at,
            expires_at: created_at + ttl,
            hit_count: 0,
        })
    }

    /// An entry is stale once its expiry time has been reached.
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Utc::now())
    }

    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Remaining time before the entry turns stale, `None` once it has.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        (self.expires_at - Utc::now()).to_std().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_expiry_window() {
        let entry =
            CacheEntry::new("k", b"payload", Duration::from_secs(60)).unwrap();
        assert!(entry.expires_at > entry.created_at);
        assert!(!entry.is_stale());
        assert!(entry.ttl_remaining().is_some());
        assert_eq!(entry.hit_count, 0);
    }

    #[test]
    fn entry_stale_at_expiry() {
        let entry =
            CacheEntry::new("k", b"payload", Duration::from_secs(60)).unwrap();
        // Boundary: now == expires_at counts as stale.
        assert!(entry.is_stale_at(entry.expires_at));
        assert!(entry.is_stale_at(entry.expires_at + chrono::Duration::seconds(1)));
        assert!(!entry.is_stale_at(entry.created_at));
    }

    #[test]
    fn zero_ttl_rejected() {
        let res = CacheEntry::new("k", b"payload", Duration::ZERO);
        assert!(matches!(res, Err(CacheError::InvalidTtl(_))));
    }
}

//! Cache-aware page loading: the glue between a fetcher and the page cache.
//!
//! The store only reports staleness; deciding what to do with an expired
//! entry is the loader's job. With stale fallback enabled, a transient fetch
//! failure is answered with the expired copy instead of an error.
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{
    fingerprint, CacheError, CacheLookup, JsonSerializer, PagePayload,
    PayloadSerializer, SharedPageCache,
};
use crate::monitor::ScrapeMonitor;
use crate::ratelimit::RateLimiter;
use crate::scrape::{FetchError, Fetcher};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Where a loaded page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    /// Fresh cache entry
    Cache,
    /// Expired cache entry served because the live fetch failed
    StaleFallback,
    /// Fetched live and written to the cache
    Live,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPage {
    pub page: PagePayload,
    pub source: PageSource,
}

/// Loads pages through the cache, fetching live on miss or expiry.
pub struct PageLoader<F> {
    fetcher: F,
    cache: SharedPageCache,
    limiter: Option<RateLimiter>,
    monitor: Arc<ScrapeMonitor>,
    ttl: Option<Duration>,
    stale_fallback: bool,
}

impl<F> PageLoader<F>
where
    F: Fetcher,
{
    pub fn new(fetcher: F, cache: SharedPageCache) -> Self {
        Self {
            fetcher,
            cache,
            limiter: None,
            monitor: Arc::new(ScrapeMonitor::new()),
            ttl: None,
            stale_fallback: false,
        }
    }

    /// Throttle live fetches to at most `max_per_minute`.
    pub fn with_rate_limit(mut self, max_per_minute: usize) -> Self {
        self.limiter = Some(RateLimiter::new(max_per_minute));
        self
    }

    /// Cache fetched pages with this TTL instead of the store default.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Serve an expired entry when the live fetch fails transiently.
    pub fn with_stale_fallback(mut self) -> Self {
        self.stale_fallback = true;
        self
    }

    /// Counters for this loader, shareable across workers.
    pub fn monitor(&self) -> Arc<ScrapeMonitor> {
        Arc::clone(&self.monitor)
    }

    /// Load one page. `params` are the filter parameters that shaped the
    /// request; they feed the cache fingerprint together with the URL.
    pub async fn load(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<LoadedPage, LoadError> {
        let key = fingerprint(url, params);
        let lookup = self.cache.get(&key).await?;

        if let CacheLookup::Fresh(entry) = &lookup {
            self.monitor.record_cache_hit();
            let page: PagePayload =
                JsonSerializer::deserialize_payload(&entry.payload)?;
            debug!("Serving cached page for {}", url);
            return Ok(LoadedPage {
                page,
                source: PageSource::Cache,
            });
        }
        self.monitor.record_cache_miss();

        if let Some(limiter) = &self.limiter {
            limiter.acquire().await;
        }

        let started = Instant::now();
        match self.fetcher.fetch(url).await {
            Ok(page) => {
                self.monitor.record_fetch(true, started.elapsed());
                let payload = JsonSerializer::serialize_payload(&page)?;
                self.cache.put(&key, &payload, self.ttl).await?;
                Ok(LoadedPage {
                    page,
                    source: PageSource::Live,
                })
            }
            Err(err) => {
                self.monitor.record_fetch(false, started.elapsed());
                if self.stale_fallback && err.is_transient() {
                    if let CacheLookup::Stale(entry) = &lookup {
                        warn!(
                            "Fetch failed for {}, serving stale cache entry: {}",
                            url, err
                        );
                        let page: PagePayload =
                            JsonSerializer::deserialize_payload(&entry.payload)?;
                        return Ok(LoadedPage {
                            page,
                            source: PageSource::StaleFallback,
                        });
                    }
                }
                Err(err.into())
            }
        }
    }
}

//! Scrape-session counters and the derived performance report.
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Running counters for one scrape session.
///
/// All counters are atomic so the monitor can be shared by `Arc` across
/// workers without a lock.
#[derive(Debug)]
pub struct ScrapeMonitor {
    started_at: Instant,
    fetches: AtomicU64,
    fetches_failed: AtomicU64,
    fetch_time_ms: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    listings: AtomicU64,
}

impl ScrapeMonitor {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            fetches: AtomicU64::new(0),
            fetches_failed: AtomicU64::new(0),
            fetch_time_ms: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            listings: AtomicU64::new(0),
        }
    }

    pub fn record_fetch(&self, success: bool, elapsed: Duration) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.fetches_failed.fetch_add(1, Ordering::Relaxed);
        }
        self.fetch_time_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_listings(&self, count: u64) {
        self.listings.fetch_add(count, Ordering::Relaxed);
    }

    pub fn report(&self) -> ScrapeReport {
        let fetches = self.fetches.load(Ordering::Relaxed);
        let fetches_failed = self.fetches_failed.load(Ordering::Relaxed);
        let fetch_time_ms = self.fetch_time_ms.load(Ordering::Relaxed);
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let cache_misses = self.cache_misses.load(Ordering::Relaxed);
        let listings = self.listings.load(Ordering::Relaxed);

        let session = self.started_at.elapsed();
        let lookups = cache_hits + cache_misses;

        ScrapeReport {
            session_duration_secs: session.as_secs_f64(),
            fetches,
            fetches_failed,
            success_rate: (fetches - fetches_failed) as f64
                / fetches.max(1) as f64,
            avg_fetch_time_ms: fetch_time_ms as f64 / fetches.max(1) as f64,
            cache_hits,
            cache_misses,
            cache_hit_rate: cache_hits as f64 / lookups.max(1) as f64,
            listings,
            listings_per_minute: listings as f64
                / (session.as_secs_f64() / 60.0).max(1.0 / 60.0),
        }
    }
}

impl Default for ScrapeMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable snapshot produced by [`ScrapeMonitor::report`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScrapeReport {
    pub session_duration_secs: f64,
    pub fetches: u64,
    pub fetches_failed: u64,
    pub success_rate: f64,
    pub avg_fetch_time_ms: f64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_rate: f64,
    pub listings: u64,
    pub listings_per_minute: f64,
}

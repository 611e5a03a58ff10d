//! PageLoader behavior against a scripted fetcher.
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use proptrawl::cache::{InMemoryPageCache, PagePayload, SharedPageCache};
use proptrawl::pipeline::{LoadError, PageLoader, PageSource};
use proptrawl::scrape::{FetchError, Fetcher};

const SHORT_TTL: Duration = Duration::from_millis(60);

/// Fetcher that serves a canned body until told to fail.
struct ScriptedFetcher {
    calls: AtomicU64,
    fail_transient: AtomicBool,
    fail_permanent: AtomicBool,
}

impl ScriptedFetcher {
    fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            fail_transient: AtomicBool::new(false),
            fail_permanent: AtomicBool::new(false),
        }
    }

    fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

/// Newtype so the loader can own a shared handle to the fetcher while the
/// test keeps its own `Arc` to drive flags and read call counts. (A bare
/// `impl Fetcher for Arc<ScriptedFetcher>` would violate the orphan rule in
/// this integration-test crate.)
struct SharedFetcher(Arc<ScriptedFetcher>);

#[async_trait]
impl Fetcher for SharedFetcher {
    async fn fetch(&self, url: &str) -> Result<PagePayload, FetchError> {
        self.0.fetch(url).await
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<PagePayload, FetchError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_permanent.load(Ordering::Relaxed) {
            return Err(FetchError::Permanent("gone".to_string()));
        }
        if self.fail_transient.load(Ordering::Relaxed) {
            return Err(FetchError::Transient("timed out".to_string()));
        }
        Ok(PagePayload {
            url: url.to_string(),
            status: 200,
            body: format!("<html>listings for {url}</html>"),
            headers: HashMap::new(),
            fetched_at: Utc::now(),
        })
    }
}

fn make_cache() -> SharedPageCache {
    Arc::new(InMemoryPageCache::with_ttl(SHORT_TTL))
}

#[tokio::test]
async fn second_load_is_served_from_cache() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let loader = PageLoader::new(SharedFetcher(Arc::clone(&fetcher)), make_cache());

    let url = "https://example.com/search";
    let params = [("location", "austin-tx")];

    let first = loader.load(url, &params).await.unwrap();
    assert_eq!(first.source, PageSource::Live);

    let second = loader.load(url, &params).await.unwrap();
    assert_eq!(second.source, PageSource::Cache);
    assert_eq!(second.page, first.page);
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn expired_entry_triggers_refetch() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let loader = PageLoader::new(SharedFetcher(Arc::clone(&fetcher)), make_cache());

    let url = "https://example.com/search";
    loader.load(url, &[]).await.unwrap();
    tokio::time::sleep(SHORT_TTL * 2).await;

    let reloaded = loader.load(url, &[]).await.unwrap();
    assert_eq!(reloaded.source, PageSource::Live);
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn stale_fallback_serves_expired_entry_on_transient_failure() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let loader = PageLoader::new(SharedFetcher(Arc::clone(&fetcher)), make_cache())
        .with_stale_fallback();

    let url = "https://example.com/search";
    let first = loader.load(url, &[]).await.unwrap();
    tokio::time::sleep(SHORT_TTL * 2).await;

    fetcher.fail_transient.store(true, Ordering::Relaxed);
    let fallback = loader.load(url, &[]).await.unwrap();
    assert_eq!(fallback.source, PageSource::StaleFallback);
    assert_eq!(fallback.page, first.page);
}

#[tokio::test]
async fn without_fallback_transient_failure_propagates() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let loader = PageLoader::new(SharedFetcher(Arc::clone(&fetcher)), make_cache());

    let url = "https://example.com/search";
    loader.load(url, &[]).await.unwrap();
    tokio::time::sleep(SHORT_TTL * 2).await;

    fetcher.fail_transient.store(true, Ordering::Relaxed);
    let res = loader.load(url, &[]).await;
    assert!(matches!(res, Err(LoadError::Fetch(FetchError::Transient(_)))));
}

#[tokio::test]
async fn permanent_failure_never_falls_back() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let loader = PageLoader::new(SharedFetcher(Arc::clone(&fetcher)), make_cache())
        .with_stale_fallback();

    let url = "https://example.com/search";
    loader.load(url, &[]).await.unwrap();
    tokio::time::sleep(SHORT_TTL * 2).await;

    fetcher.fail_permanent.store(true, Ordering::Relaxed);
    let res = loader.load(url, &[]).await;
    assert!(matches!(res, Err(LoadError::Fetch(FetchError::Permanent(_)))));
}

#[tokio::test]
async fn miss_without_any_entry_propagates_failure() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    fetcher.fail_transient.store(true, Ordering::Relaxed);
    let loader = PageLoader::new(SharedFetcher(Arc::clone(&fetcher)), make_cache())
        .with_stale_fallback();

    let res = loader.load("https://example.com/search", &[]).await;
    assert!(matches!(res, Err(LoadError::Fetch(FetchError::Transient(_)))));
}

#[tokio::test]
async fn monitor_tracks_loader_traffic() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let loader = PageLoader::new(SharedFetcher(Arc::clone(&fetcher)), make_cache());
    let monitor = loader.monitor();

    let url = "https://example.com/search";
    loader.load(url, &[]).await.unwrap();
    loader.load(url, &[]).await.unwrap();
    loader.load(url, &[]).await.unwrap();

    let report = monitor.report();
    assert_eq!(report.fetches, 1);
    assert_eq!(report.cache_hits, 2);
    assert_eq!(report.cache_misses, 1);
    assert_eq!(report.success_rate, 1.0);
}

#[tokio::test]
async fn distinct_params_load_distinct_pages() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let loader = PageLoader::new(SharedFetcher(Arc::clone(&fetcher)), make_cache());

    let url = "https://example.com/search";
    loader.load(url, &[("location", "austin-tx")]).await.unwrap();
    loader.load(url, &[("location", "dallas-tx")]).await.unwrap();

    assert_eq!(fetcher.calls(), 2);
}

//! Minimal end-to-end run: a canned fetcher behind the cache-aware loader,
//! with the fjall backend persisting pages under a temp directory.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use proptrawl::cache::{FjallPageCache, PageCache, PagePayload, SharedPageCache};
use proptrawl::pipeline::PageLoader;
use proptrawl::scrape::{FetchError, Fetcher};

struct CannedFetcher;

#[async_trait]
impl Fetcher for CannedFetcher {
    async fn fetch(&self, url: &str) -> Result<PagePayload, FetchError> {
        // Stand-in for a real HTTP client.
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(PagePayload {
            url: url.to_string(),
            status: 200,
            body: "<html><div class=\"listing\">$450,000</div></html>"
                .to_string(),
            headers: HashMap::new(),
            fetched_at: Utc::now(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let dir = tempfile::tempdir()?;
    let cache: SharedPageCache = Arc::new(FjallPageCache::open_with_ttl(
        dir.path(),
        Duration::from_secs(60 * 60),
    )?);

    let loader = PageLoader::new(CannedFetcher, Arc::clone(&cache))
        .with_rate_limit(30)
        .with_stale_fallback();

    let url = "https://example.com/search";
    let params = [
        ("location", "austin-tx"),
        ("min_price", "200000"),
        ("max_price", "500000"),
    ];

    // First load fetches live, second one is answered by the cache.
    for _ in 0..2 {
        let loaded = loader.load(url, &params).await?;
        println!("loaded {} via {:?}", loaded.page.url, loaded.source);
    }

    let report = loader.monitor().report();
    println!(
        "fetches: {}, cache hits: {}, hit rate: {:.2}",
        report.fetches, report.cache_hits, report.cache_hit_rate
    );
    println!("cache stats: {:?}", cache.stats().await?);

    Ok(())
}

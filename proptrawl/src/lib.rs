//! # proptrawl - caching toolkit for real-estate listing crawlers
//!
//! `proptrawl` wraps the plumbing every listing crawler ends up rebuilding:
//! a persistent TTL page cache, request fingerprinting, rate limiting and
//! scrape-session accounting, tied together by a cache-aware page loader.
//! Site-specific fetching, HTML extraction and export stay behind traits so
//! each target site plugs in its own implementation.
//!
//! ## Modules
//!
//! - `config`: YAML run configuration.
//! - `listing`: typed listing and search-criteria models.
//! - `monitor`: scrape-session counters and performance reports.
//! - `pipeline`: the cache-aware [`pipeline::PageLoader`].
//! - `ratelimit`: sliding-window request throttling.
//! - `scrape`: the `Fetcher` / `Extractor` / `Exporter` seams.
//!
//! The page cache itself lives in the `proptrawl-cache` crate, re-exported
//! here as [`cache`].
pub mod config;
pub mod listing;
pub mod monitor;
pub mod pipeline;
pub mod ratelimit;
pub mod scrape;

pub use proptrawl_cache as cache;

// re-export
pub use async_trait;
pub use chrono;
pub use serde;
pub use serde_json;
pub use thiserror;
pub use tracing;

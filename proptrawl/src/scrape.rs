//! Collaborator seams around the cache: fetching raw pages, extracting
//! structured records from them, exporting the results. Transport, per-site
//! HTML parsing and output formats all live behind these traits.
use async_trait::async_trait;
use thiserror::Error;

use crate::cache::PagePayload;

#[derive(Error, Debug)]
pub enum FetchError {
    /// The request failed in a way that may succeed on retry, e.g. a
    /// timeout or an upstream 5xx.
    #[error("Transient fetch error: {0}")]
    Transient(String),
    /// The request will keep failing, e.g. a 404 or a blocked URL.
    #[error("Permanent fetch error: {0}")]
    Permanent(String),
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Supplies raw page content for a URL. Implementations own the HTTP
/// transport, retries and politeness headers.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PagePayload, FetchError>;
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Selector failed: {0}")]
    Selector(String),
    #[error("Malformed page: {0}")]
    MalformedPage(String),
}

/// Turns one raw page into structured records; pluggable per site.
pub trait Extractor: Send + Sync {
    type Record;

    fn extract(&self, page: &PagePayload)
        -> Result<Vec<Self::Record>, ExtractError>;
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Export failed: {0}")]
    Other(String),
}

/// Persists a batch of structured records to an external format.
#[async_trait]
pub trait Exporter<R>: Send + Sync
where
    R: Send + Sync,
{
    async fn export(&self, records: &[R]) -> Result<(), ExportError>;
}

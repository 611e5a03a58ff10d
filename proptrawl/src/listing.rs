//! Typed models for scraped listings and search requests.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::fingerprint;

/// A scraped real-estate listing. Extractors fill in what the page offers;
/// everything beyond the source fields is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f32>,
    pub square_feet: Option<f64>,
    pub property_type: Option<String>,
    pub source_url: String,
    pub source_site: String,
    pub scraped_at: DateTime<Utc>,
}

impl Listing {
    pub fn new(
        source_url: impl Into<String>,
        source_site: impl Into<String>,
    ) -> Self {
        Self {
            title: None,
            price: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            bedrooms: None,
            bathrooms: None,
            square_feet: None,
            property_type: None,
            source_url: source_url.into(),
            source_site: source_site.into(),
            scraped_at: Utc::now(),
        }
    }
}

/// Search filters for a listing crawl; doubles as cache fingerprint input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchCriteria {
    pub location: String,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_bedrooms: Option<u32>,
    pub max_bedrooms: Option<u32>,
}

impl SearchCriteria {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Default::default()
        }
    }

    /// Cache key for this search against a site's search endpoint. Every set
    /// filter participates, so two different searches never share an entry.
    pub fn cache_key(&self, search_url: &str) -> String {
        let mut params: Vec<(&str, String)> =
            vec![("location", self.location.clone())];
        if let Some(v) = self.min_price {
            params.push(("min_price", v.to_string()));
        }
        if let Some(v) = self.max_price {
            params.push(("max_price", v.to_string()));
        }
        if let Some(v) = self.min_bedrooms {
            params.push(("min_bedrooms", v.to_string()));
        }
        if let Some(v) = self.max_bedrooms {
            params.push(("max_bedrooms", v.to_string()));
        }

        let borrowed: Vec<(&str, &str)> =
            params.iter().map(|(name, value)| (*name, value.as_str())).collect();
        fingerprint(search_url, &borrowed)
    }
}

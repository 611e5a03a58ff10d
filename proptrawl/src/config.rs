//! YAML configuration for a crawl run.
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 \
     Safari/537.36";

/// Settings for a scrape run. Every field has a default, so a config file
/// only needs to name what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScraperConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub requests_per_minute: usize,
    pub cache_dir: PathBuf,
    pub cache_expiry_hours: u64,
    pub output_dir: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            max_retries: 3,
            requests_per_minute: 30,
            cache_dir: PathBuf::from("cache"),
            cache_expiry_hours: 24,
            output_dir: PathBuf::from("data"),
        }
    }
}

impl ScraperConfig {
    pub fn from_yaml_file(
        config_file_path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(config_file_path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Default TTL for the page cache.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_expiry_hours * 60 * 60)
    }
}

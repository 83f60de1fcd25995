//! Configuration for the Solr similarity backend

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Solr backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolrConfig {
    /// Solr base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Core holding the deck corpus
    #[serde(default = "default_core")]
    pub core: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// TTL for cached more-like-this responses in seconds
    #[serde(default = "default_mlt_cache_ttl")]
    pub mlt_cache_ttl_secs: u64,

    /// Maximum cached more-like-this responses (0 disables the cache)
    #[serde(default = "default_mlt_cache_size")]
    pub mlt_cache_max_size: u64,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8983".to_string()
}
fn default_core() -> String {
    "decks".to_string()
}
fn default_timeout_ms() -> u64 {
    5000
}
fn default_mlt_cache_ttl() -> u64 {
    600
}
fn default_mlt_cache_size() -> u64 {
    1000
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            core: default_core(),
            timeout_ms: default_timeout_ms(),
            mlt_cache_ttl_secs: default_mlt_cache_ttl(),
            mlt_cache_max_size: default_mlt_cache_size(),
        }
    }
}

impl SolrConfig {
    /// Load configuration overrides from environment variables
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("SOLR_URL") {
            self.base_url = val;
        }

        if let Ok(val) = std::env::var("SOLR_CORE") {
            self.core = val;
        }

        if let Ok(val) = std::env::var("SOLR_TIMEOUT_MS") {
            if let Ok(timeout) = val.parse() {
                self.timeout_ms = timeout;
            }
        }

        if let Ok(val) = std::env::var("SOLR_MLT_CACHE_TTL_SECS") {
            if let Ok(ttl) = val.parse() {
                self.mlt_cache_ttl_secs = ttl;
            }
        }

        if let Ok(val) = std::env::var("SOLR_MLT_CACHE_SIZE") {
            if let Ok(size) = val.parse() {
                self.mlt_cache_max_size = size;
            }
        }

        self
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get cache TTL as Duration
    pub fn mlt_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.mlt_cache_ttl_secs)
    }
}

//! Configuration for the Article Fetcher

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`HttpArticleFetcher`](crate::HttpArticleFetcher)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// User-Agent header sent to the source
    pub user_agent: String,

    /// Largest document accepted (bytes)
    pub max_document_bytes: usize,
}

impl FetcherConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("fetcher timeout_secs must be greater than 0".to_string());
        }
        if self.max_document_bytes == 0 {
            return Err("fetcher max_document_bytes must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: concat!("branchcast/", env!("CARGO_PKG_VERSION")).to_string(),
            max_document_bytes: 5 * 1024 * 1024,
        }
    }
}

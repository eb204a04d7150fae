//! Error types for the Article Fetcher

use thiserror::Error;

/// Errors that can occur while fetching an article
#[derive(Error, Debug)]
pub enum FetchError {
    /// Locator is not an absolute http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Request did not complete in time
    #[error("Fetch timeout")]
    Timeout,

    /// Server answered with a non-success status
    #[error("Source returned HTTP {0}")]
    Status(u16),

    /// Response is not a document we can read
    #[error("Unparseable document: {0}")]
    Unparseable(String),

    /// Document contains no extractable text
    #[error("No text could be extracted from the document")]
    EmptyContent,

    /// HTTP client could not be built
    #[error("Client error: {0}")]
    Client(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

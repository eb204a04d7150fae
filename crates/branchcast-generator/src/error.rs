//! Error types for the Generator

use branchcast_fetcher::FetchError;
use thiserror::Error;

/// Errors from generating a single branch variant
#[derive(Error, Debug)]
pub enum GenerationError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// LLM call exceeded the per-call timeout
    #[error("Generation timeout")]
    Timeout,

    /// Response is not the expected JSON object
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// Short form exceeds the configured cap
    #[error("Short form too long: {len} chars (max: {max})")]
    ShortFormTooLong {
        /// Actual length in characters
        len: usize,
        /// Configured cap
        max: usize,
    },
}

impl From<serde_json::Error> for GenerationError {
    fn from(e: serde_json::Error) -> Self {
        GenerationError::InvalidFormat(e.to_string())
    }
}

/// Errors that abort a whole batch
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Article could not be fetched or had no text
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A branch's variant could not be generated
    #[error("Generation failed at branch {index} ('{branch}'): {source}")]
    Generation {
        /// Position of the branch in the registry
        index: usize,
        /// Branch name
        branch: String,
        /// Underlying failure
        #[source]
        source: GenerationError,
    },

    /// Variants do not cover the registry
    #[error("Incomplete batch: {0}")]
    Incomplete(String),

    /// Archive store error
    #[error("Store error: {0}")]
    Store(String),
}

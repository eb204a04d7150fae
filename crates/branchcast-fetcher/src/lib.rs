//! Branchcast Article Fetcher
//!
//! Retrieves a news article over HTTP and reduces it to plain text for the
//! generator.
//!
//! # Architecture
//!
//! ```text
//! URL → HttpArticleFetcher → HTML → extract_text → ArticleText
//! ```
//!
//! One outbound request per fetch, no retry. An empty extraction is an
//! error ([`FetchError::EmptyContent`]), never an empty article.
//!
//! # Example Usage
//!
//! ```no_run
//! use branchcast_fetcher::{FetcherConfig, HttpArticleFetcher};
//! use branchcast_domain::traits::ArticleSource;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = HttpArticleFetcher::new(FetcherConfig::default())?;
//! let text = fetcher.fetch("https://example.com/news/1").await?;
//! println!("{} chars", text.char_count());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extract;
mod fetcher;

pub use config::FetcherConfig;
pub use error::FetchError;
pub use extract::extract_text;
pub use fetcher::HttpArticleFetcher;

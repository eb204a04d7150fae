//! Branchcast Generator
//!
//! Turns one article into a batch of branch-specific social posts using an
//! LLM, then hands the complete batch to the archive.
//!
//! # Architecture
//!
//! ```text
//! URL → ArticleSource → ArticleText
//!                          │
//!          ┌───────────────┴────────────────┐
//!          │ for each branch (registry order) │
//!          │   PromptBuilder → LLM → decode   │ ← prior variants
//!          └───────────────┬────────────────┘
//!                          ▼
//!                  GenerationDraft → ArchiveStore
//! ```
//!
//! # Key Features
//!
//! - **Stance-aware prompts**: supportive or critical tone per batch
//! - **Two registers**: a capped short form and a multi-sentence long form
//! - **Anti-repetition**: every call sees the variants already written in the batch
//! - **Strict decoding**: one place absorbs code fences and format drift
//! - **All-or-nothing batches**: any failure aborts before anything is stored
//!
//! # Example Usage
//!
//! ```no_run
//! use branchcast_generator::{BatchOrchestrator, GenerationPipeline, GeneratorConfig};
//! use branchcast_domain::{BranchRegistry, GenerationRequest, Stance};
//! use branchcast_fetcher::{FetcherConfig, HttpArticleFetcher};
//! use branchcast_llm::MockProvider;
//! use branchcast_store::SqliteArchive;
//! use std::sync::{Arc, Mutex};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = HttpArticleFetcher::new(FetcherConfig::default())?;
//! let llm = MockProvider::new(r#"{"shortForm": "Hi!", "longForm": "Hello. Welcome."}"#);
//! let store = Arc::new(Mutex::new(SqliteArchive::new(":memory:")?));
//!
//! let orchestrator = BatchOrchestrator::new(
//!     fetcher,
//!     llm,
//!     store,
//!     BranchRegistry::default_branches(),
//!     GeneratorConfig::default(),
//! );
//!
//! let id = orchestrator
//!     .run_batch(GenerationRequest {
//!         source_url: "https://example.com/news/1".to_string(),
//!         stance: Stance::Support,
//!     })
//!     .await?;
//! println!("stored generation {}", id);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod batch;
mod config;
mod error;
mod generator;
mod parser;
mod prompt;


pub use batch::{BatchOrchestrator, GenerationPipeline};
pub use config::GeneratorConfig;
pub use error::{GenerationError, PipelineError};
pub use generator::VariantGenerator;
pub use parser::decode_variant;
pub use prompt::{PromptBuilder, RESPONSE_SCHEMA};

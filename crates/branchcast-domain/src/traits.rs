//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::article::ArticleText;
use crate::branch::BranchId;
use crate::generation::{BranchFeedEntry, GenerationDraft, GenerationId, GenerationRecord, ViewEvent};
use async_trait::async_trait;

/// Trait for retrieving article text from a locator
///
/// Implemented by the infrastructure layer (branchcast-fetcher)
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Error type for fetch operations
    type Error;

    /// Retrieve the document and extract its plain text
    async fn fetch(&self, locator: &str) -> Result<ArticleText, Self::Error>;
}

/// Trait for generative text backends
///
/// Implemented by the infrastructure layer (branchcast-llm)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with structured (JSON) output, if the backend supports it
    async fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}

/// Trait for the durable archive of generations and their views
///
/// Implemented by the infrastructure layer (branchcast-store)
pub trait ArchiveStore {
    /// Error type for store operations
    type Error;

    /// Append a complete batch; the store assigns and returns the id
    fn append_generation(&mut self, draft: GenerationDraft) -> Result<GenerationId, Self::Error>;

    /// Get a generation by id
    fn get_generation(&self, id: GenerationId) -> Result<Option<GenerationRecord>, Self::Error>;

    /// All generations, newest first
    fn list_generations(&self) -> Result<Vec<GenerationRecord>, Self::Error>;

    /// Feed for one branch, newest first
    ///
    /// Records without a variant for the branch are skipped.
    fn list_for_branch(&self, branch: &BranchId) -> Result<Vec<BranchFeedEntry>, Self::Error> {
        Ok(self
            .list_generations()?
            .iter()
            .filter_map(|record| record.feed_entry_for(branch))
            .collect())
    }

    /// Append a view event to a generation's ledger
    ///
    /// Returns `false` when no generation has that id; nothing is written then.
    fn record_view(&mut self, id: GenerationId, view: ViewEvent) -> Result<bool, Self::Error>;
}

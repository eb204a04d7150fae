//! Batch Orchestrator: one article, every branch, all-or-nothing

use crate::config::GeneratorConfig;
use crate::error::PipelineError;
use crate::generator::VariantGenerator;
use async_trait::async_trait;
use branchcast_domain::traits::{ArchiveStore, ArticleSource, LlmProvider};
use branchcast_domain::{
    now_millis, BranchRegistry, BranchVariant, GenerationDraft, GenerationId, GenerationRequest,
};
use branchcast_fetcher::FetchError;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// A runnable generation pipeline
///
/// Lets the HTTP layer hold the orchestrator without naming its
/// provider, fetcher and store types.
#[async_trait]
pub trait GenerationPipeline: Send + Sync {
    /// Fetch the article, generate every branch in order, persist the batch
    async fn run_batch(&self, request: GenerationRequest) -> Result<GenerationId, PipelineError>;

    /// Branches this pipeline generates for
    fn registry(&self) -> &BranchRegistry;
}

/// Sequential per-branch generation over a fixed registry
pub struct BatchOrchestrator<F, L, S>
where
    F: ArticleSource<Error = FetchError>,
    L: LlmProvider,
    S: ArchiveStore,
{
    fetcher: F,
    generator: VariantGenerator<L>,
    store: Arc<Mutex<S>>,
    registry: BranchRegistry,
}

impl<F, L, S> BatchOrchestrator<F, L, S>
where
    F: ArticleSource<Error = FetchError>,
    L: LlmProvider,
    L::Error: std::fmt::Display,
    S: ArchiveStore + Send,
    S::Error: std::fmt::Display,
{
    /// Create a new orchestrator
    pub fn new(
        fetcher: F,
        llm_provider: L,
        store: Arc<Mutex<S>>,
        registry: BranchRegistry,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            fetcher,
            generator: VariantGenerator::new(llm_provider, config),
            store,
            registry,
        }
    }

    fn persist(&self, draft: GenerationDraft) -> Result<GenerationId, PipelineError> {
        let mut store = self
            .store
            .lock()
            .map_err(|e| PipelineError::Store(format!("Store lock error: {}", e)))?;
        store
            .append_generation(draft)
            .map_err(|e| PipelineError::Store(e.to_string()))
    }
}

#[async_trait]
impl<F, L, S> GenerationPipeline for BatchOrchestrator<F, L, S>
where
    F: ArticleSource<Error = FetchError>,
    L: LlmProvider,
    L::Error: std::fmt::Display,
    S: ArchiveStore + Send,
    S::Error: std::fmt::Display,
{
    async fn run_batch(&self, request: GenerationRequest) -> Result<GenerationId, PipelineError> {
        let total = self.registry.len();
        info!(
            "Starting {} batch for {} across {} branches",
            request.stance, request.source_url, total
        );

        let article = self.fetcher.fetch(&request.source_url).await?;

        // Each call sees everything produced so far in this batch
        let mut variants: Vec<BranchVariant> = Vec::with_capacity(total);
        for (index, branch) in self.registry.iter().enumerate() {
            debug!("Generating variant {}/{} for '{}'", index + 1, total, branch);

            let variant = self
                .generator
                .generate(&article, request.stance, branch, &variants)
                .await
                .map_err(|source| {
                    warn!(
                        "Batch for {} aborted at branch {}/{} ('{}'): {}",
                        request.source_url,
                        index + 1,
                        total,
                        branch,
                        source
                    );
                    PipelineError::Generation {
                        index,
                        branch: branch.as_str().to_string(),
                        source,
                    }
                })?;

            variants.push(variant);
        }

        let draft = GenerationDraft::new(
            request.source_url.clone(),
            request.stance,
            now_millis(),
            variants,
            &self.registry,
        )
        .map_err(|e| PipelineError::Incomplete(e.to_string()))?;

        let id = self.persist(draft)?;

        info!("Stored generation {} for {} ({} variants)", id, request.source_url, total);

        Ok(id)
    }

    fn registry(&self) -> &BranchRegistry {
        &self.registry
    }
}

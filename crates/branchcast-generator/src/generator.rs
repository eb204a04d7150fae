//! Core Variant Generator implementation

use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::parser::decode_variant;
use crate::prompt::{PromptBuilder, RESPONSE_SCHEMA};
use branchcast_domain::traits::LlmProvider;
use branchcast_domain::{ArticleText, BranchId, BranchVariant, Stance};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::debug;

/// Produces one branch's variant with a single LLM call
pub struct VariantGenerator<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: GeneratorConfig,
}

impl<L> VariantGenerator<L>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
{
    /// Create a new generator
    pub fn new(llm_provider: L, config: GeneratorConfig) -> Self {
        Self {
            llm_provider: Arc::new(llm_provider),
            config,
        }
    }

    /// Generate the variant for `branch`.
    ///
    /// `prior_variants` are the variants already produced in this batch;
    /// the most recent `prior_variants_limit` of them are shown to the model
    /// so it can steer away from repeating them. One attempt, no retry.
    pub async fn generate(
        &self,
        article: &ArticleText,
        stance: Stance,
        branch: &BranchId,
        prior_variants: &[BranchVariant],
    ) -> Result<BranchVariant, GenerationError> {
        let skip = prior_variants
            .len()
            .saturating_sub(self.config.prior_variants_limit);
        let context = &prior_variants[skip..];

        let prompt = PromptBuilder::new(
            article.prefix(self.config.max_article_chars),
            self.config.directive(stance),
            branch,
        )
        .with_short_form_cap(self.config.short_form_max_chars)
        .with_prior_variants(context)
        .build();

        debug!("Prompt for '{}': {} chars", branch, prompt.len());

        let response = timeout(
            self.config.call_timeout(),
            self.llm_provider.generate_structured(&prompt, RESPONSE_SCHEMA),
        )
        .await
        .map_err(|_| GenerationError::Timeout)?
        .map_err(|e| GenerationError::Llm(e.to_string()))?;

        debug!("LLM response for '{}': {} chars", branch, response.len());

        decode_variant(&response, branch, self.config.short_form_max_chars)
    }
}

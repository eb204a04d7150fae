//! Branchcast Domain Layer
//!
//! Core value types and trait seams for the branch content pipeline.
//! Only `uuid` and `async-trait` are pulled in; infrastructure (HTTP,
//! storage, model backends) lives in the other crates and plugs in through
//! the traits in [`traits`].
//!
//! ## Key Concepts
//!
//! - **Branch**: an organizational unit that receives its own post variant
//! - **Stance**: editorial direction applied to a whole batch
//! - **Variant**: the short-form / long-form text pair for one branch
//! - **Generation**: one persisted batch, one variant per registered branch
//! - **View**: an append-only record of a branch opening a generation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod article;
pub mod branch;
pub mod generation;
pub mod stance;
pub mod traits;
pub mod variant;

// Re-exports for convenience
pub use article::ArticleText;
pub use branch::{BranchId, BranchRegistry, RegistryError};
pub use generation::{
    now_millis, BranchFeedEntry, DraftError, GenerationDraft, GenerationId, GenerationRecord,
    GenerationRequest, ViewEvent,
};
pub use stance::Stance;
pub use variant::{BranchVariant, VariantError, DEFAULT_SHORT_FORM_MAX_CHARS};

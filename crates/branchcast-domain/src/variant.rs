//! Variant module - the text pair generated for one branch

use crate::branch::BranchId;
use std::fmt;

/// Default cap on short-form length, in characters
pub const DEFAULT_SHORT_FORM_MAX_CHARS: usize = 280;

/// Why a candidate variant was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantError {
    /// Short form is empty after trimming
    EmptyShortForm,

    /// Long form is empty after trimming
    EmptyLongForm,

    /// Short form exceeds the configured cap
    ShortFormTooLong {
        /// Actual length in characters
        len: usize,
        /// Configured cap
        max: usize,
    },
}

impl fmt::Display for VariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantError::EmptyShortForm => write!(f, "short form is empty"),
            VariantError::EmptyLongForm => write!(f, "long form is empty"),
            VariantError::ShortFormTooLong { len, max } => {
                write!(f, "short form is {} chars (max: {})", len, max)
            }
        }
    }
}

impl std::error::Error for VariantError {}

/// Short-form / long-form post pair for one branch.
///
/// Immutable once produced. The short form is a casual, length-capped post;
/// the long form is a multi-sentence post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchVariant {
    branch_id: BranchId,
    short_form: String,
    long_form: String,
}

impl BranchVariant {
    /// Build a validated variant.
    ///
    /// Both fields are trimmed. The short form may not exceed
    /// `short_form_max_chars` characters; it is never truncated.
    ///
    /// # Examples
    ///
    /// ```
    /// use branchcast_domain::{BranchId, BranchVariant, VariantError};
    ///
    /// let ok = BranchVariant::new(BranchId::new("A"), "short", "Long one. Two.", 280);
    /// assert!(ok.is_ok());
    ///
    /// let err = BranchVariant::new(BranchId::new("A"), "x".repeat(281), "Long.", 280);
    /// assert_eq!(err.unwrap_err(), VariantError::ShortFormTooLong { len: 281, max: 280 });
    /// ```
    pub fn new(
        branch_id: BranchId,
        short_form: impl Into<String>,
        long_form: impl Into<String>,
        short_form_max_chars: usize,
    ) -> Result<Self, VariantError> {
        let short_form = short_form.into().trim().to_string();
        let long_form = long_form.into().trim().to_string();

        if short_form.is_empty() {
            return Err(VariantError::EmptyShortForm);
        }
        if long_form.is_empty() {
            return Err(VariantError::EmptyLongForm);
        }

        let len = short_form.chars().count();
        if len > short_form_max_chars {
            return Err(VariantError::ShortFormTooLong {
                len,
                max: short_form_max_chars,
            });
        }

        Ok(Self {
            branch_id,
            short_form,
            long_form,
        })
    }

    /// Rebuild a variant that was validated when it was first produced.
    ///
    /// This is for storage layer deserialization.
    pub fn restore(branch_id: BranchId, short_form: String, long_form: String) -> Self {
        Self {
            branch_id,
            short_form,
            long_form,
        }
    }

    /// Branch this variant was generated for
    pub fn branch_id(&self) -> &BranchId {
        &self.branch_id
    }

    /// Short, casual post
    pub fn short_form(&self) -> &str {
        &self.short_form
    }

    /// Longer, multi-sentence post
    pub fn long_form(&self) -> &str {
        &self.long_form
    }
}

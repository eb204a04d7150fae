//! Generation module - persisted batches and their view ledger

use crate::branch::{BranchId, BranchRegistry};
use crate::stance::Stance;
use crate::variant::BranchVariant;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Identifier of a persisted generation, assigned by the archive.
///
/// Backed by a UUIDv7 so identifiers sort chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationId(u128);

impl GenerationId {
    /// Generate a new UUIDv7-based id
    ///
    /// # Examples
    ///
    /// ```
    /// use branchcast_domain::GenerationId;
    ///
    /// let id = GenerationId::new();
    /// let parsed = GenerationId::parse(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an id from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an id from its hyphenated UUID form
    pub fn parse(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s.trim())
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid generation id: {}", e))
    }

    /// Raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for GenerationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Incoming request to generate one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Article locator
    pub source_url: String,

    /// Editorial direction for every variant
    pub stance: Stance,
}

/// Why a set of variants cannot become a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// Variant count differs from the registry size
    CountMismatch {
        /// Registry size
        expected: usize,
        /// Variants supplied
        actual: usize,
    },

    /// A variant is not in its branch's registry slot
    OrderMismatch {
        /// Slot index
        index: usize,
        /// Branch registered at that slot
        expected: String,
        /// Branch of the supplied variant
        actual: String,
    },
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftError::CountMismatch { expected, actual } => {
                write!(f, "expected {} variants, got {}", expected, actual)
            }
            DraftError::OrderMismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "variant {} is for '{}', expected '{}'",
                index, actual, expected
            ),
        }
    }
}

impl std::error::Error for DraftError {}

/// A complete batch that has not been persisted yet.
///
/// Only constructible with exactly one variant per registered branch, in
/// registry order, so a partial batch can never reach the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationDraft {
    source_url: String,
    stance: Stance,
    created_at: u64,
    variants: Vec<BranchVariant>,
}

impl GenerationDraft {
    /// Check variants against the registry and build a draft
    pub fn new(
        source_url: impl Into<String>,
        stance: Stance,
        created_at: u64,
        variants: Vec<BranchVariant>,
        registry: &BranchRegistry,
    ) -> Result<Self, DraftError> {
        if variants.len() != registry.len() {
            return Err(DraftError::CountMismatch {
                expected: registry.len(),
                actual: variants.len(),
            });
        }

        for (index, (variant, branch)) in variants.iter().zip(registry.iter()).enumerate() {
            if variant.branch_id() != branch {
                return Err(DraftError::OrderMismatch {
                    index,
                    expected: branch.as_str().to_string(),
                    actual: variant.branch_id().as_str().to_string(),
                });
            }
        }

        Ok(Self {
            source_url: source_url.into(),
            stance,
            created_at,
            variants,
        })
    }

    /// Article locator
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Batch stance
    pub fn stance(&self) -> Stance {
        self.stance
    }

    /// Server-assigned creation time (ms since epoch)
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Variants in registry order
    pub fn variants(&self) -> &[BranchVariant] {
        &self.variants
    }

    /// Attach the archive-assigned id, producing a record with no views
    pub fn into_record(self, id: GenerationId) -> GenerationRecord {
        GenerationRecord {
            id,
            source_url: self.source_url,
            stance: self.stance,
            created_at: self.created_at,
            variants: self.variants,
            views: Vec::new(),
        }
    }
}

/// A branch opening a generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEvent {
    /// Branch that viewed the record
    pub branch_id: BranchId,

    /// When the view happened (ms since epoch)
    pub viewed_at: u64,
}

/// A persisted batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRecord {
    /// Archive-assigned identifier
    pub id: GenerationId,

    /// Article locator
    pub source_url: String,

    /// Batch stance
    pub stance: Stance,

    /// Creation time (ms since epoch)
    pub created_at: u64,

    /// One variant per branch, in registry order
    pub variants: Vec<BranchVariant>,

    /// Append-only view ledger
    pub views: Vec<ViewEvent>,
}

impl GenerationRecord {
    /// Variant generated for a branch, if the record has one
    pub fn variant_for(&self, branch: &BranchId) -> Option<&BranchVariant> {
        self.variants.iter().find(|v| v.branch_id() == branch)
    }

    /// Project this record onto a single branch's feed
    pub fn feed_entry_for(&self, branch: &BranchId) -> Option<BranchFeedEntry> {
        self.variant_for(branch).map(|variant| BranchFeedEntry {
            id: self.id,
            source_url: self.source_url.clone(),
            stance: self.stance,
            created_at: self.created_at,
            variant: variant.clone(),
        })
    }
}

/// Record metadata plus the one variant matching a branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchFeedEntry {
    /// Record id
    pub id: GenerationId,

    /// Article locator
    pub source_url: String,

    /// Batch stance
    pub stance: Stance,

    /// Creation time (ms since epoch)
    pub created_at: u64,

    /// The branch's variant
    pub variant: BranchVariant,
}

//! Branchcast Storage Layer
//!
//! Implements the `ArchiveStore` trait on SQLite.
//!
//! # Architecture
//!
//! - One `generations` table, one row per batch
//! - Variants and views embedded as JSON arrays in the row
//! - View appends are a single `UPDATE` using `json_insert(views, '$[#]', …)`,
//!   so concurrent viewers never race on a read-modify-write
//!
//! # Examples
//!
//! ```
//! use branchcast_store::SqliteArchive;
//! use branchcast_domain::traits::ArchiveStore;
//!
//! let store = SqliteArchive::new(":memory:").unwrap();
//! assert!(store.list_generations().unwrap().is_empty());
//! ```

#![warn(missing_docs)]

use branchcast_domain::traits::ArchiveStore;
use branchcast_domain::{
    BranchFeedEntry, BranchId, BranchVariant, GenerationDraft, GenerationId, GenerationRecord,
    Stance, ViewEvent,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Embedded JSON could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Variant as embedded in the `variants` column
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredVariant {
    branch_id: String,
    branch_key: String,
    short_form: String,
    long_form: String,
}

/// View as embedded in the `views` column
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredView {
    branch_id: String,
    viewed_at: i64,
}

/// Raw row before decoding
struct GenerationRow {
    id: Vec<u8>,
    source_url: String,
    stance: String,
    created_at: i64,
    variants: String,
    views: String,
}

impl GenerationRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            source_url: row.get(1)?,
            stance: row.get(2)?,
            created_at: row.get(3)?,
            variants: row.get(4)?,
            views: row.get(5)?,
        })
    }

    fn into_record(self) -> Result<GenerationRecord, StoreError> {
        let variants: Vec<StoredVariant> = serde_json::from_str(&self.variants)?;
        let views: Vec<StoredView> = serde_json::from_str(&self.views)?;

        Ok(GenerationRecord {
            id: SqliteArchive::bytes_to_id(&self.id)?,
            source_url: self.source_url,
            stance: SqliteArchive::str_to_stance(&self.stance)?,
            created_at: self.created_at as u64,
            variants: variants.into_iter().map(restore_variant).collect(),
            views: views
                .into_iter()
                .map(|v| ViewEvent {
                    branch_id: BranchId::new(v.branch_id),
                    viewed_at: v.viewed_at as u64,
                })
                .collect(),
        })
    }
}

fn restore_variant(stored: StoredVariant) -> BranchVariant {
    BranchVariant::restore(BranchId::new(stored.branch_id), stored.short_form, stored.long_form)
}

const SELECT_COLUMNS: &str = "SELECT id, source_url, stance, created_at, variants, views FROM generations";

/// SQLite-based implementation of ArchiveStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share one archive behind a
/// `Mutex`, or give each thread its own `SqliteArchive`.
pub struct SqliteArchive {
    conn: Connection,
}

impl SqliteArchive {
    /// Open (or create) an archive at the given path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Number of stored generations
    pub fn generation_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM generations", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Convert GenerationId to bytes for storage
    fn id_to_bytes(id: GenerationId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to GenerationId
    fn bytes_to_id(bytes: &[u8]) -> Result<GenerationId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!(
                "Expected 16 bytes for GenerationId, got {}",
                bytes.len()
            ))
        })?;
        Ok(GenerationId::from_value(u128::from_be_bytes(arr)))
    }

    fn str_to_stance(s: &str) -> Result<Stance, StoreError> {
        Stance::parse(s).ok_or_else(|| StoreError::InvalidData(format!("Unknown stance: {}", s)))
    }
}

impl ArchiveStore for SqliteArchive {
    type Error = StoreError;

    fn append_generation(&mut self, draft: GenerationDraft) -> Result<GenerationId, Self::Error> {
        let id = GenerationId::new();

        let variants: Vec<StoredVariant> = draft
            .variants()
            .iter()
            .map(|v| StoredVariant {
                branch_id: v.branch_id().as_str().to_string(),
                branch_key: v.branch_id().key().to_string(),
                short_form: v.short_form().to_string(),
                long_form: v.long_form().to_string(),
            })
            .collect();

        self.conn.execute(
            "INSERT INTO generations (id, source_url, stance, created_at, variants, views)
             VALUES (?1, ?2, ?3, ?4, ?5, '[]')",
            params![
                Self::id_to_bytes(id),
                draft.source_url(),
                draft.stance().as_str(),
                draft.created_at() as i64,
                serde_json::to_string(&variants)?,
            ],
        )?;

        debug!("Inserted generation {} with {} variants", id, variants.len());

        Ok(id)
    }

    fn get_generation(&self, id: GenerationId) -> Result<Option<GenerationRecord>, Self::Error> {
        let row = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![Self::id_to_bytes(id)],
                GenerationRow::from_row,
            )
            .optional()?;

        row.map(GenerationRow::into_record).transpose()
    }

    fn list_generations(&self) -> Result<Vec<GenerationRecord>, Self::Error> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_COLUMNS))?;

        let rows = stmt
            .query_map([], GenerationRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(GenerationRow::into_record).collect()
    }

    fn list_for_branch(&self, branch: &BranchId) -> Result<Vec<BranchFeedEntry>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT g.id, g.source_url, g.stance, g.created_at, v.value
             FROM generations g, json_each(g.variants) v
             WHERE json_extract(v.value, '$.branchKey') = ?1
             ORDER BY g.created_at DESC, g.id DESC",
        )?;

        let rows = stmt
            .query_map(params![branch.key()], |row| {
                Ok((
                    row.get::<_, Vec<u8>>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut entries = Vec::with_capacity(rows.len());
        let mut last_id = None;
        for (id_bytes, source_url, stance, created_at, variant_json) in rows {
            let id = Self::bytes_to_id(&id_bytes)?;
            // A record carries at most one variant per branch
            if last_id == Some(id) {
                continue;
            }
            last_id = Some(id);

            let stored: StoredVariant = serde_json::from_str(&variant_json)?;
            entries.push(BranchFeedEntry {
                id,
                source_url,
                stance: Self::str_to_stance(&stance)?,
                created_at: created_at as u64,
                variant: restore_variant(stored),
            });
        }

        Ok(entries)
    }

    fn record_view(&mut self, id: GenerationId, view: ViewEvent) -> Result<bool, Self::Error> {
        let changed = self.conn.execute(
            "UPDATE generations
             SET views = json_insert(views, '$[#]', json_object('branchId', ?2, 'viewedAt', ?3))
             WHERE id = ?1",
            params![
                Self::id_to_bytes(id),
                view.branch_id.as_str(),
                view.viewed_at as i64,
            ],
        )?;

        Ok(changed > 0)
    }
}

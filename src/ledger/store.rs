//! RedirectStore trait, record type, and result types.

use crate::domain::Slug;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// ===========================================
// StoreError Type
// ===========================================

/// Errors that can occur in redirect storage or uniqueness probing.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A persisted row no longer parses.
    #[error("invalid redirect row for '{former}': {reason}")]
    InvalidRow { former: String, reason: String },

    /// The host's uniqueness probe failed.
    #[error("uniqueness probe failed: {0}")]
    Probe(String),

    /// An I/O error occurred.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for store and probe operations.
pub type StoreResult<T> = Result<T, StoreError>;

// ===========================================
// RedirectRecord
// ===========================================

/// One redirect ledger entry: a slug a record used to hold, and the slug
/// currently replacing it.
///
/// `record_type` disambiguates host types sharing one ledger. At most one
/// live entry exists per `(record_type, former_slug)` pair, enforced by the
/// ledger's delete-before-insert ordering rather than a store constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectRecord {
    record_type: String,
    former_slug: Slug,
    current_slug: Slug,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RedirectRecord {
    /// Creates an entry stamped with the current time.
    pub fn new(record_type: impl Into<String>, former_slug: Slug, current_slug: Slug) -> Self {
        let now = Utc::now();
        Self {
            record_type: record_type.into(),
            former_slug,
            current_slug,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds an entry from persisted parts.
    pub fn from_parts(
        record_type: impl Into<String>,
        former_slug: Slug,
        current_slug: Slug,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            record_type: record_type.into(),
            former_slug,
            current_slug,
            created_at,
            updated_at,
        }
    }

    /// The host type this entry belongs to.
    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    /// The slug the record used to hold.
    pub fn former_slug(&self) -> &Slug {
        &self.former_slug
    }

    /// The slug that currently replaces it.
    pub fn current_slug(&self) -> &Slug {
        &self.current_slug
    }

    /// When the entry was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the entry was last repointed.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Repoints the entry at a new current slug, refreshing `updated_at`.
    pub fn repoint(&mut self, to: &Slug) {
        self.current_slug = to.clone();
        self.updated_at = Utc::now();
    }
}

// ===========================================
// RedirectStore Trait
// ===========================================

/// Storage primitives the redirect ledger composes.
///
/// Implementations only store and fetch; the collapse semantics and step
/// ordering live in [`RedirectLedger`](crate::ledger::RedirectLedger).
/// Former/current arguments are plain `&str` because lookups start from raw
/// URL segments.
pub trait RedirectStore {
    /// The entry whose former slug matches, if any.
    fn find(&self, record_type: &str, former: &str) -> StoreResult<Option<RedirectRecord>>;

    /// All entries for a record type, insertion-ordered.
    fn all_for(&self, record_type: &str) -> StoreResult<Vec<RedirectRecord>>;

    /// Appends an entry.
    fn insert(&mut self, record: RedirectRecord) -> StoreResult<()>;

    /// Deletes entries whose former slug matches; returns how many went.
    fn delete_by_former(&mut self, record_type: &str, former: &str) -> StoreResult<usize>;

    /// Repoints entries whose current slug is `from` at `to`, refreshing
    /// their `updated_at`; returns how many moved.
    fn repoint_current(&mut self, record_type: &str, from: &str, to: &str) -> StoreResult<usize>;

    /// Deletes every entry for a record type; returns how many went.
    fn delete_record_type(&mut self, record_type: &str) -> StoreResult<usize>;

    /// Runs `f` as one atomic unit where the store supports it.
    ///
    /// The default just runs `f`. Transactional stores override this with
    /// their native transaction so a failure rolls back every step.
    fn in_transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> StoreResult<T>) -> StoreResult<T>
    where
        Self: Sized,
    {
        f(self)
    }
}

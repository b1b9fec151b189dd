//! Redirect bookkeeping for renamed slugs.
//!
//! When a record's slug changes, the ledger books the former slug against
//! the current one so old links keep resolving. Rename chains collapse to
//! a single hop and rollbacks erase the entries they obsolete, so the
//! ledger never grows stale redirects.

mod memory;
mod schema;
mod sqlite;
mod store;

pub use memory::MemoryRedirectStore;
pub use schema::{create_schema, get_schema_version};
pub use sqlite::SqliteRedirectStore;
pub use store::{RedirectRecord, RedirectStore, StoreError, StoreResult};

use crate::domain::Slug;

// ===========================================
// RedirectLedger Struct
// ===========================================

/// Bookkeeper for slug renames over a [`RedirectStore`].
///
/// Entries map a former slug to the slug that replaced it, scoped by
/// record type. [`record_change`](RedirectLedger::record_change) keeps two
/// invariants as renames accumulate:
///
/// - every entry resolves in one hop (no chains to walk), and
/// - a rename rolled back to an earlier slug leaves no entry claiming
///   that slug is former.
#[derive(Debug)]
pub struct RedirectLedger<S: RedirectStore> {
    store: S,
}

impl<S: RedirectStore> RedirectLedger<S> {
    /// Wraps a store in a ledger.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Books a rename from `former` to `current`.
    ///
    /// No-op when the two are equal. Otherwise, in one transaction:
    /// entries claiming `current` as former are deleted (the rename
    /// reclaims that slug), entries pointing at `former` are repointed
    /// at `current` (old links resolve in one hop), and the new entry
    /// is inserted.
    pub fn record_change(
        &mut self,
        record_type: &str,
        former: &Slug,
        current: &Slug,
    ) -> StoreResult<()> {
        if former == current {
            return Ok(());
        }

        let entry = RedirectRecord::new(record_type, former.clone(), current.clone());
        self.store.in_transaction(|store| {
            store.delete_by_former(record_type, current.as_str())?;
            store.repoint_current(record_type, former.as_str(), current.as_str())?;
            store.insert(entry)
        })
    }

    /// Resolves a former slug to the current one, if a redirect is booked.
    pub fn lookup(&self, record_type: &str, former: &str) -> StoreResult<Option<Slug>> {
        Ok(self
            .store
            .find(record_type, former)?
            .map(|entry| entry.current_slug().clone()))
    }

    /// Deletes every redirect for a record type; returns how many went.
    pub fn purge(&mut self, record_type: &str) -> StoreResult<usize> {
        self.store.delete_record_type(record_type)
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a mutable reference to the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the ledger, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }
}

// ===========================================
// Path Rewriting
// ===========================================

/// Replaces the trailing slug segment of `path` with `current`.
///
/// The final run of word characters and hyphens is swapped out; a path
/// that doesn't end in such a run comes back unchanged.
pub fn redirected_path(path: &str, current: &Slug) -> String {
    let stem = path.trim_end_matches(is_segment_char);
    if stem.len() == path.len() {
        return path.to_string();
    }
    format!("{}{}", stem, current)
}

fn is_segment_char(c: char) -> bool {
    c == '-' || c == '_' || c.is_ascii_alphanumeric()
}

//! In-memory redirect store for tests and ephemeral hosts.

use crate::domain::Slug;
use crate::ledger::{RedirectRecord, RedirectStore, StoreError, StoreResult};

/// Vec-backed redirect store.
///
/// Keeps records in insertion order; all operations are linear scans.
/// Uses the default [`RedirectStore::in_transaction`], which simply runs
/// the closure. Intended for tests and for hosts whose redirect set is
/// small and rebuilt per process.
#[derive(Debug, Default)]
pub struct MemoryRedirectStore {
    records: Vec<RedirectRecord>,
}

impl MemoryRedirectStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when no records are held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RedirectStore for MemoryRedirectStore {
    fn find(&self, record_type: &str, former: &str) -> StoreResult<Option<RedirectRecord>> {
        Ok(self
            .records
            .iter()
            .find(|r| r.record_type() == record_type && r.former_slug().as_str() == former)
            .cloned())
    }

    fn all_for(&self, record_type: &str) -> StoreResult<Vec<RedirectRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.record_type() == record_type)
            .cloned()
            .collect())
    }

    fn insert(&mut self, record: RedirectRecord) -> StoreResult<()> {
        self.records.push(record);
        Ok(())
    }

    fn delete_by_former(&mut self, record_type: &str, former: &str) -> StoreResult<usize> {
        let before = self.records.len();
        self.records
            .retain(|r| !(r.record_type() == record_type && r.former_slug().as_str() == former));
        Ok(before - self.records.len())
    }

    fn repoint_current(&mut self, record_type: &str, from: &str, to: &str) -> StoreResult<usize> {
        let target = Slug::new(to).map_err(|e| StoreError::InvalidRow {
            former: from.to_string(),
            reason: format!("invalid repoint target: {}", e),
        })?;
        let mut moved = 0;
        for record in &mut self.records {
            if record.record_type() == record_type && record.current_slug().as_str() == from {
                record.repoint(&target);
                moved += 1;
            }
        }
        Ok(moved)
    }

    fn delete_record_type(&mut self, record_type: &str) -> StoreResult<usize> {
        let before = self.records.len();
        self.records.retain(|r| r.record_type() != record_type);
        Ok(before - self.records.len())
    }
}

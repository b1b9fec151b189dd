//! In-memory stand-ins for a host application's records and slug index.

#![allow(dead_code)]

use slugtrail::domain::{RecordId, ScopeValue, Slug, SlugRecord};
use slugtrail::ledger::StoreResult;
use std::cell::RefCell;
use std::collections::HashMap;

// ===========================================
// HostRecord
// ===========================================

/// Attribute-bag record, the shape a host ORM row presents.
#[derive(Debug, Default)]
pub struct HostRecord {
    attrs: HashMap<String, String>,
    id: Option<RecordId>,
}

impl HostRecord {
    /// An unsaved record with no identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// A persisted record with the given identity.
    pub fn persisted(id: i64) -> Self {
        Self {
            attrs: HashMap::new(),
            id: Some(RecordId::from(id)),
        }
    }

    /// Sets an attribute, builder-style.
    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.attrs.insert(field.to_string(), value.to_string());
        self
    }

    /// Marks the record as saved under the given identity.
    pub fn mark_persisted(&mut self, id: i64) {
        self.id = Some(RecordId::from(id));
    }

    /// Reads an attribute directly, for assertions.
    pub fn attr(&self, field: &str) -> Option<&str> {
        self.attrs.get(field).map(String::as_str)
    }
}

impl SlugRecord for HostRecord {
    fn get(&self, field: &str) -> Option<String> {
        self.attrs.get(field).cloned()
    }

    fn set(&mut self, field: &str, value: Option<String>) {
        match value {
            Some(v) => {
                self.attrs.insert(field.to_string(), v);
            }
            None => {
                self.attrs.remove(field);
            }
        }
    }

    fn is_new(&self) -> bool {
        self.id.is_none()
    }

    fn id(&self) -> Option<RecordId> {
        self.id.clone()
    }
}

// ===========================================
// SlugIndex
// ===========================================

struct IndexRow {
    id: String,
    slug: String,
    scope: HashMap<String, Option<String>>,
}

/// In-memory slug table standing in for the host's storage.
///
/// Rows are upserted by id, so re-claiming after a rename models an ORM
/// updating the row in place. The probe treats a missing scope field as
/// the storage's NULL.
#[derive(Default)]
pub struct SlugIndex {
    rows: RefCell<Vec<IndexRow>>,
}

impl SlugIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts a scope-less row.
    pub fn claim(&self, id: i64, slug: &str) {
        self.claim_scoped(id, slug, &[]);
    }

    /// Upserts a row with scope values.
    pub fn claim_scoped(&self, id: i64, slug: &str, scope: &[(&str, Option<&str>)]) {
        let mut rows = self.rows.borrow_mut();
        let id = id.to_string();
        let scope: HashMap<String, Option<String>> = scope
            .iter()
            .map(|(field, value)| (field.to_string(), value.map(str::to_string)))
            .collect();

        if let Some(row) = rows.iter_mut().find(|row| row.id == id) {
            row.slug = slug.to_string();
            row.scope = scope;
        } else {
            rows.push(IndexRow {
                id,
                slug: slug.to_string(),
                scope,
            });
        }
    }

    /// Number of rows held.
    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    /// Uniqueness probe over the current rows.
    pub fn probe(
        &self,
    ) -> impl Fn(&Slug, &[ScopeValue], Option<&RecordId>) -> StoreResult<bool> + '_ {
        move |candidate: &Slug, scope: &[ScopeValue], exclude: Option<&RecordId>| {
            Ok(self.exists(candidate, scope, exclude))
        }
    }

    fn exists(&self, candidate: &Slug, scope: &[ScopeValue], exclude: Option<&RecordId>) -> bool {
        self.rows.borrow().iter().any(|row| {
            row.slug == candidate.as_str()
                && exclude.is_none_or(|id| row.id != id.as_str())
                && scope.iter().all(|pair| {
                    let row_value = row.scope.get(pair.field()).cloned().flatten();
                    row_value.as_deref() == pair.value()
                })
        })
    }
}

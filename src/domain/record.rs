//! Host record access: identity and attribute-level read/write.

use crate::normalize::Normalizer;
use std::fmt;

/// Opaque identity of a host record.
///
/// The core never interprets ids. They exist so the uniqueness probe can
/// exclude the record being renamed from its own collision check, and so
/// hosts can fall back to the id when building a URL for a record with no
/// slug yet. Hosts with integer primary keys convert via `From<i64>`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a RecordId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId(\"{}\")", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Attribute-level view of a host record.
///
/// This is the only surface the lifecycle needs from the host's model layer:
/// string-valued attribute reads and writes, plus persistence identity.
/// Absent attributes are `None`; the core never coerces absent to `""`.
pub trait SlugRecord {
    /// Reads an attribute value.
    fn get(&self, field: &str) -> Option<String>;

    /// Writes an attribute value (`None` clears it).
    fn set(&mut self, field: &str, value: Option<String>);

    /// True while the record has never been persisted.
    fn is_new(&self) -> bool;

    /// The record's persistent identity, absent for new records.
    fn id(&self) -> Option<RecordId>;
}

/// Wrapper that normalizes writes to the slug field.
///
/// Any value assigned to the named slug field is passed through the
/// normalizer before reaching the inner record, so a raw title pasted into
/// the slug attribute still ends up in canonical form (a blank value becomes
/// the normalizer's fallback token). All other fields delegate untouched.
/// `None` writes pass through: clearing the attribute stays possible.
///
/// The lifecycle writes assigned slugs through this wrapper; hosts that let
/// users edit the slug directly can wrap their record the same way.
pub struct NormalizingRecord<'a, R: SlugRecord> {
    inner: &'a mut R,
    slug_field: &'a str,
    normalizer: &'a Normalizer,
}

impl<'a, R: SlugRecord> NormalizingRecord<'a, R> {
    /// Wraps a record so writes to `slug_field` are normalized.
    pub fn new(inner: &'a mut R, slug_field: &'a str, normalizer: &'a Normalizer) -> Self {
        Self {
            inner,
            slug_field,
            normalizer,
        }
    }
}

impl<R: SlugRecord> SlugRecord for NormalizingRecord<'_, R> {
    fn get(&self, field: &str) -> Option<String> {
        self.inner.get(field)
    }

    fn set(&mut self, field: &str, value: Option<String>) {
        if field == self.slug_field {
            let normalized = value.map(|v| self.normalizer.normalize(&v).into_string());
            self.inner.set(field, normalized);
        } else {
            self.inner.set(field, value);
        }
    }

    fn is_new(&self) -> bool {
        self.inner.is_new()
    }

    fn id(&self) -> Option<RecordId> {
        self.inner.id()
    }
}

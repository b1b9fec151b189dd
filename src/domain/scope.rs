//! Uniqueness scope pairs.

/// One `(field, value)` pair of a uniqueness scope.
///
/// Scope pairs narrow the collision check: a slug only has to be unique
/// among records whose scope fields hold the same values. A record with no
/// value for a scope field carries `None`, and the host's uniqueness probe
/// must translate that to its storage's "IS NULL" form; absent is never
/// coerced to an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeValue {
    field: String,
    value: Option<String>,
}

impl ScopeValue {
    /// Creates a scope pair. `None` means the record has no value.
    pub fn new(field: impl Into<String>, value: Option<String>) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }

    /// The scope field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The record's value for the field, absent when unset.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

//! Per-record-type slug configuration.

use crate::domain::Guard;

// ===========================================
// SlugSettings Type
// ===========================================

/// Configuration for slugging one record type.
///
/// Tracks which fields feed the slug, where it is stored, and how
/// uniqueness is scoped. Construct with [`SlugSettings::new`] for the
/// defaults or [`SlugSettings::builder`] to override them.
#[derive(Debug, Clone)]
pub struct SlugSettings {
    record_type: String,
    fields: Vec<String>,
    slug_field: String,
    unique: bool,
    scope: Vec<String>,
    guard: Guard,
    transliterate: Option<bool>,
}

impl SlugSettings {
    /// Creates settings with the defaults: slug stored in `"slug"`,
    /// uniqueness on, no scope, no guard.
    ///
    /// `fields` are the tracked source fields, in order; their values
    /// join with a single space to form the base text.
    pub fn new(record_type: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            record_type: record_type.into(),
            fields,
            slug_field: "slug".to_string(),
            unique: true,
            scope: Vec::new(),
            guard: Guard::default(),
            transliterate: None,
        }
    }

    /// Creates a builder for settings with non-default options.
    pub fn builder(record_type: impl Into<String>, fields: Vec<String>) -> SlugSettingsBuilder {
        SlugSettingsBuilder::new(record_type, fields)
    }

    /// Returns the record type used to partition the redirect ledger.
    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    /// Returns the tracked source fields.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the name of the attribute the slug is stored in.
    pub fn slug_field(&self) -> &str {
        &self.slug_field
    }

    /// Whether assigned slugs must be unique within their scope.
    pub fn unique(&self) -> bool {
        self.unique
    }

    /// Returns the fields that partition the uniqueness namespace.
    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    /// Returns the regeneration guard.
    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    /// Returns the transliteration override, if one was set.
    pub fn transliterate(&self) -> Option<bool> {
        self.transliterate
    }
}

// ===========================================
// SlugSettingsBuilder
// ===========================================

/// Builder for [`SlugSettings`] with non-default options.
pub struct SlugSettingsBuilder {
    settings: SlugSettings,
}

impl SlugSettingsBuilder {
    fn new(record_type: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            settings: SlugSettings::new(record_type, fields),
        }
    }

    /// Stores the slug in a differently-named attribute.
    pub fn slug_field(mut self, field: impl Into<String>) -> Self {
        self.settings.slug_field = field.into();
        self
    }

    /// Turns the uniqueness search on or off.
    pub fn unique(mut self, unique: bool) -> Self {
        self.settings.unique = unique;
        self
    }

    /// Sets the fields that partition the uniqueness namespace.
    pub fn scope(mut self, scope: Vec<String>) -> Self {
        self.settings.scope = scope;
        self
    }

    /// Sets the regeneration guard.
    pub fn guard(mut self, guard: Guard) -> Self {
        self.settings.guard = guard;
        self
    }

    /// Overrides the normalizer's default transliteration setting.
    pub fn transliterate(mut self, enabled: bool) -> Self {
        self.settings.transliterate = Some(enabled);
        self
    }

    /// Builds the settings.
    pub fn build(self) -> SlugSettings {
        self.settings
    }
}

// ===========================================
// Schema Budgets
// ===========================================

/// Source of per-field length limits, typically a storage column width.
///
/// A limit of zero means the field is unbounded and truncation is skipped.
pub trait SchemaBudget {
    /// Maximum character length the named field may hold.
    fn max_length(&self, field: &str) -> usize;
}

/// One limit for every field, for hosts without schema introspection.
#[derive(Debug, Clone, Copy)]
pub struct FixedBudget(pub usize);

impl SchemaBudget for FixedBudget {
    fn max_length(&self, _field: &str) -> usize {
        self.0
    }
}

impl<F> SchemaBudget for F
where
    F: Fn(&str) -> usize,
{
    fn max_length(&self, field: &str) -> usize {
        self(field)
    }
}

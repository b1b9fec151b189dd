//! Validated slug type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A canonical URL slug.
///
/// Slugs are lowercase ASCII identifiers safe to embed in a URL path:
/// letters, digits, underscores, and single interior hyphens.
///
/// # Validation Rules
/// - Non-empty
/// - Must contain only lowercase letters, digits, hyphens, and underscores
/// - Never starts or ends with a hyphen
/// - No consecutive hyphens
///
/// `Slug::new` validates an already-canonical value (e.g. one read back from
/// storage). Arbitrary text becomes a slug through
/// [`Normalizer`](crate::normalize::Normalizer), which never fails.
///
/// # Examples
///
/// ```
/// use slugtrail::domain::Slug;
///
/// let slug = Slug::new("api-design").unwrap();
/// assert_eq!(slug.as_str(), "api-design");
///
/// // Raw text is not a slug; normalize it first.
/// assert!(Slug::new("API Design").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

/// Error returned when parsing an invalid slug.
#[derive(Debug, Clone)]
pub struct ParseSlugError(String);

impl fmt::Display for ParseSlugError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseSlugError {}

impl Slug {
    /// Creates a Slug from an already-canonical string.
    ///
    /// # Errors
    ///
    /// Returns `ParseSlugError` if:
    /// - The slug is empty
    /// - The slug contains characters outside `a-z`, `0-9`, `-`, `_`
    /// - The slug starts or ends with a hyphen, or contains `--`
    pub fn new(s: &str) -> Result<Self, ParseSlugError> {
        if s.is_empty() {
            return Err(ParseSlugError("slug cannot be empty".to_string()));
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(ParseSlugError(format!(
                "invalid slug '{}': slugs must contain only lowercase letters, digits, hyphens, and underscores",
                s
            )));
        }

        if s.starts_with('-') || s.ends_with('-') {
            return Err(ParseSlugError(format!(
                "invalid slug '{}': slugs cannot start or end with a hyphen",
                s
            )));
        }

        if s.contains("--") {
            return Err(ParseSlugError(format!(
                "invalid slug '{}': slugs cannot contain consecutive hyphens",
                s
            )));
        }

        Ok(Self(s.to_string()))
    }

    /// Wraps text the normalizer has already canonicalized.
    ///
    /// Callers guarantee the value satisfies the validation rules; this is
    /// how the normalizer returns a `Slug` without a fallible round-trip.
    pub(crate) fn from_canonical(s: String) -> Self {
        Self(s)
    }

    /// Returns the slug value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the slug, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slug(\"{}\")", self.0)
    }
}

impl FromStr for Slug {
    type Err = ParseSlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl PartialEq<str> for Slug {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Slug {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for Slug {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Slug {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

//! Text-to-slug normalization.

use crate::domain::Slug;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Converts arbitrary text to canonical slug form.
///
/// The pipeline, in order:
/// - Transliterates Latin-range diacritics to ASCII when enabled (`ā` → `a`,
///   `ö` → `o`, `ß` → `ss`); characters outside the Latin blocks are never
///   transliterated
/// - Removes all remaining non-ASCII characters (deleted, not substituted)
/// - Removes all characters other than letters, digits, underscores, spaces,
///   and hyphens
/// - Collapses every run of spaces and/or hyphens into a single hyphen
/// - Trims leading and trailing hyphens
/// - Lowercases the result
/// - Falls back to a random hex token when nothing survives
///
/// Normalization never fails; every input produces a valid [`Slug`].
///
/// # Examples
///
/// ```
/// use slugtrail::normalize::Normalizer;
///
/// let normalizer = Normalizer::new();
/// assert_eq!(normalizer.normalize("API Design Notes!").as_str(), "api-design-notes");
/// assert_eq!(normalizer.normalize("hello_world  -  again").as_str(), "hello_world-again");
/// ```
#[derive(Debug, Clone)]
pub struct Normalizer {
    transliterate: bool,
}

impl Normalizer {
    /// Creates a normalizer with the default transliteration setting:
    /// enabled when the `translit` feature is compiled in.
    pub fn new() -> Self {
        Self {
            transliterate: cfg!(feature = "translit"),
        }
    }

    /// Creates a normalizer with an explicit transliteration setting.
    ///
    /// Without the `translit` feature the pass is unavailable and the
    /// setting has no effect.
    pub fn with_transliteration(enabled: bool) -> Self {
        Self {
            transliterate: enabled,
        }
    }

    /// Whether the transliteration pass will run.
    pub fn transliterates(&self) -> bool {
        self.transliterate && cfg!(feature = "translit")
    }

    /// Normalizes text into a slug.
    pub fn normalize(&self, text: &str) -> Slug {
        let ascii = self.fold_to_ascii(text);

        // Keep word characters, map spaces to hyphens, drop the rest
        let mut result = String::with_capacity(ascii.len());
        for c in ascii.chars() {
            if c.is_ascii_alphanumeric() || c == '_' {
                result.push(c.to_ascii_lowercase());
            } else if c == ' ' || c == '-' {
                result.push('-');
            }
            // Skip all other characters
        }

        // Collapse consecutive hyphens
        let mut collapsed = String::with_capacity(result.len());
        let mut prev_was_hyphen = false;
        for c in result.chars() {
            if c == '-' {
                if !prev_was_hyphen {
                    collapsed.push(c);
                }
                prev_was_hyphen = true;
            } else {
                collapsed.push(c);
                prev_was_hyphen = false;
            }
        }

        let trimmed = collapsed.trim_matches('-');
        if trimmed.is_empty() {
            return Slug::from_canonical(fallback_token(text));
        }

        Slug::from_canonical(trimmed.to_string())
    }

    /// Folds the input to plain ASCII: transliterates Latin diacritics when
    /// enabled, deletes every other non-ASCII character.
    #[cfg(feature = "translit")]
    fn fold_to_ascii(&self, text: &str) -> String {
        if !self.transliterate {
            return text.chars().filter(|c| c.is_ascii()).collect();
        }

        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            if c.is_ascii() {
                out.push(c);
            } else if is_latin(c) {
                if let Some(folded) = deunicode::deunicode_char(c) {
                    out.push_str(folded);
                }
            }
            // Non-Latin scripts are deleted, never substituted
        }
        out
    }

    #[cfg(not(feature = "translit"))]
    fn fold_to_ascii(&self, text: &str) -> String {
        text.chars().filter(|c| c.is_ascii()).collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// True for non-ASCII characters in the Latin Unicode blocks, the only ones
/// the transliteration pass folds.
#[cfg(feature = "translit")]
fn is_latin(c: char) -> bool {
    let u = c as u32;
    (0x00C0..=0x00FF).contains(&u) // Latin-1 Supplement letters
        || (0x0100..=0x017F).contains(&u) // Latin Extended-A
        || (0x0180..=0x024F).contains(&u) // Latin Extended-B
        || (0x1E00..=0x1EFF).contains(&u) // Latin Extended Additional
}

/// Token for inputs that normalize to nothing.
///
/// Hex digest of the input plus the current time, so a fully stripped source
/// still gets a usable slug. Fixed width, lowercase hex; not required to be
/// deterministic.
fn fallback_token(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    hasher.update(now.as_nanos().to_le_bytes());

    format!("{:x}", hasher.finalize())
}

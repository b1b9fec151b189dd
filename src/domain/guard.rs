//! Regeneration guard predicates.

use crate::domain::SlugRecord;
use std::fmt;
use std::sync::Arc;

/// Shared predicate over a host record.
pub type RecordPredicate = Arc<dyn Fn(&dyn SlugRecord) -> bool + Send + Sync>;

/// Controls whether the lifecycle may regenerate a record's slug.
///
/// A guard is fixed configuration, not per-call state: it is evaluated
/// against the record at the top of every apply. All representations gate
/// identically: a `Flag(false)` skips regeneration exactly like an
/// `If` predicate returning false.
///
/// # Examples
///
/// ```
/// use slugtrail::domain::Guard;
///
/// // Regenerate only for records still marked as drafts.
/// let guard = Guard::when(|record| record.get("state").as_deref() == Some("draft"));
/// # let _ = guard;
/// ```
#[derive(Clone, Default)]
pub enum Guard {
    /// Regeneration is always allowed.
    #[default]
    Always,
    /// Fixed switch: regeneration allowed only while `true`.
    Flag(bool),
    /// Regeneration allowed only when the predicate returns `true`.
    If(RecordPredicate),
    /// Regeneration allowed only when the predicate returns `false`.
    Unless(RecordPredicate),
}

impl Guard {
    /// Wraps a closure as a [`Guard::If`] predicate.
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&dyn SlugRecord) -> bool + Send + Sync + 'static,
    {
        Guard::If(Arc::new(predicate))
    }

    /// Wraps a closure as a [`Guard::Unless`] predicate.
    pub fn unless<F>(predicate: F) -> Self
    where
        F: Fn(&dyn SlugRecord) -> bool + Send + Sync + 'static,
    {
        Guard::Unless(Arc::new(predicate))
    }

    /// Evaluates the guard against a record.
    pub fn allows(&self, record: &dyn SlugRecord) -> bool {
        match self {
            Guard::Always => true,
            Guard::Flag(enabled) => *enabled,
            Guard::If(predicate) => predicate(record),
            Guard::Unless(predicate) => !predicate(record),
        }
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::Always => write!(f, "Guard::Always"),
            Guard::Flag(enabled) => write!(f, "Guard::Flag({})", enabled),
            Guard::If(_) => write!(f, "Guard::If(<predicate>)"),
            Guard::Unless(_) => write!(f, "Guard::Unless(<predicate>)"),
        }
    }
}

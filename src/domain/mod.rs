//! Core types: Slug, RecordId, ScopeValue, Guard, record access

mod guard;
mod record;
mod scope;
mod slug;

pub use guard::{Guard, RecordPredicate};
pub use record::{NormalizingRecord, RecordId, SlugRecord};
pub use scope::ScopeValue;
pub use slug::{ParseSlugError, Slug};

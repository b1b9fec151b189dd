//! slugtrail - slug generation with scoped uniqueness and redirect history

pub mod assign;
pub mod domain;
pub mod ledger;
pub mod lifecycle;
pub mod normalize;

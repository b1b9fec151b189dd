//! Slug assignment: budget truncation and uniqueness suffixing.

use crate::domain::{RecordId, ScopeValue, Slug};
use crate::ledger::StoreResult;
use crate::normalize::Normalizer;

/// Inputs for one slug assignment.
#[derive(Debug)]
pub struct AssignRequest<'a> {
    /// Raw source text, pre-normalization.
    pub base_text: &'a str,
    /// Maximum slug length in characters (usually the storage column width).
    /// Zero disables truncation.
    pub budget: usize,
    /// Ordered uniqueness scope pairs, passed to the probe untouched.
    pub scope: &'a [ScopeValue],
    /// Identity excluded from collision checks (the record being renamed).
    pub exclude: Option<&'a RecordId>,
}

/// Host-owned existence check for candidate slugs.
///
/// Implementations must honor the scope pairs (an absent value compares as
/// the storage's NULL, never as an empty string) and must not count the
/// excluded record. A probe failure aborts assignment and propagates
/// unchanged.
///
/// Any matching closure is a probe, so tests and small hosts can pass a
/// lambda over whatever index they keep.
pub trait UniquenessProbe {
    /// True when a record other than `exclude` already holds `candidate`
    /// within the scope.
    fn slug_exists(
        &self,
        candidate: &Slug,
        scope: &[ScopeValue],
        exclude: Option<&RecordId>,
    ) -> StoreResult<bool>;
}

impl<F> UniquenessProbe for F
where
    F: Fn(&Slug, &[ScopeValue], Option<&RecordId>) -> StoreResult<bool>,
{
    fn slug_exists(
        &self,
        candidate: &Slug,
        scope: &[ScopeValue],
        exclude: Option<&RecordId>,
    ) -> StoreResult<bool> {
        self(candidate, scope, exclude)
    }
}

/// Computes slug values within a length budget.
///
/// In common mode (`unique == false`) the normalized text is truncated to
/// the budget and returned as-is. In unique mode every candidate is checked
/// against the host's uniqueness probe: the plain value first, then `-2`,
/// `-3`, … until a free candidate turns up. Truncation always keeps the
/// leading characters and is re-applied for every candidate, so no result
/// exceeds the budget even as the suffix grows.
///
/// # Examples
///
/// ```
/// use slugtrail::assign::{AssignRequest, SlugAssigner};
/// use slugtrail::normalize::Normalizer;
///
/// let assigner = SlugAssigner::new(Normalizer::new(), false);
/// let request = AssignRequest {
///     base_text: "API Design Notes",
///     budget: 50,
///     scope: &[],
///     exclude: None,
/// };
/// let probe = slugtrail::assign::never_exists;
/// assert_eq!(assigner.assign(&request, &probe).unwrap().as_str(), "api-design-notes");
/// ```
#[derive(Debug, Clone)]
pub struct SlugAssigner {
    normalizer: Normalizer,
    unique: bool,
}

impl SlugAssigner {
    /// Creates an assigner; `unique` selects suffix-searching mode.
    pub fn new(normalizer: Normalizer, unique: bool) -> Self {
        Self { normalizer, unique }
    }

    /// The normalizer candidates are derived with.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Computes the slug for `request`.
    ///
    /// # Errors
    ///
    /// Fails only when the uniqueness probe fails; the error propagates
    /// unchanged. Common mode never consults the probe.
    pub fn assign(
        &self,
        request: &AssignRequest<'_>,
        probe: &impl UniquenessProbe,
    ) -> StoreResult<Slug> {
        let base = self.normalizer.normalize(request.base_text);

        if !self.unique {
            return Ok(truncate(&base, request.budget));
        }

        let head = truncate(&base, request.budget);
        if !probe.slug_exists(&head, request.scope, request.exclude)? {
            return Ok(head);
        }

        // The first duplicate of "foo" becomes "foo-2"
        let mut counter: u64 = 2;
        loop {
            let candidate = suffixed(&base, counter, request.budget);
            if !probe.slug_exists(&candidate, request.scope, request.exclude)? {
                return Ok(candidate);
            }
            counter += 1;
        }
    }
}

/// Probe for hosts with no uniqueness requirement: nothing ever collides.
pub fn never_exists(
    _candidate: &Slug,
    _scope: &[ScopeValue],
    _exclude: Option<&RecordId>,
) -> StoreResult<bool> {
    Ok(false)
}

/// Keeps the leading `budget` characters, trimming any hyphens the cut
/// leaves dangling. A zero budget disables truncation.
fn truncate(slug: &Slug, budget: usize) -> Slug {
    let s = slug.as_str();
    if budget == 0 || s.len() <= budget {
        return slug.clone();
    }
    // Slugs are ASCII, so byte indexing is character indexing
    Slug::from_canonical(s[..budget].trim_end_matches('-').to_string())
}

/// Builds the nth candidate: a truncated head plus `-n`, within budget.
fn suffixed(base: &Slug, n: u64, budget: usize) -> Slug {
    let suffix = format!("-{}", n);
    if budget == 0 {
        return Slug::from_canonical(format!("{}{}", base.as_str(), suffix));
    }

    let keep = budget.saturating_sub(suffix.len());
    if keep == 0 {
        // No room for any base character: degrade to the bare counter digits
        let digits = n.to_string();
        let cut = digits.len().min(budget);
        return Slug::from_canonical(digits[..cut].to_string());
    }

    let head = truncate(base, keep);
    Slug::from_canonical(format!("{}{}", head.as_str(), suffix))
}

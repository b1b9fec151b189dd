//! Slug lifecycle orchestration: settings, guards, and the apply hook.
//!
//! [`SlugLifecycle`] ties the normalizer, assigner, and redirect ledger
//! together behind one pre-persistence hook. Hosts call
//! [`apply`](SlugLifecycle::apply) once per record mutation; the lifecycle
//! decides whether the slug needs regenerating, assigns it, and books a
//! redirect when a persisted record's slug moves.

mod settings;

pub use settings::{FixedBudget, SchemaBudget, SlugSettings, SlugSettingsBuilder};

use crate::assign::{AssignRequest, SlugAssigner, UniquenessProbe};
use crate::domain::{NormalizingRecord, ScopeValue, Slug, SlugRecord};
use crate::ledger::{RedirectLedger, RedirectStore, StoreResult};
use crate::normalize::Normalizer;

// ===========================================
// SlugLifecycle
// ===========================================

/// Pre-persistence slug hook for one record type.
///
/// Couples [`SlugSettings`] with a [`SchemaBudget`] and a
/// [`UniquenessProbe`]; the redirect ledger is borrowed per call, since one
/// ledger usually serves many record types.
///
/// # Examples
///
/// ```
/// use slugtrail::ledger::{MemoryRedirectStore, RedirectLedger};
/// use slugtrail::lifecycle::{FixedBudget, SlugLifecycle, SlugSettings};
/// # use slugtrail::domain::{RecordId, SlugRecord};
/// # #[derive(Default)]
/// # struct Post {
/// #     title: Option<String>,
/// #     slug: Option<String>,
/// # }
/// # impl SlugRecord for Post {
/// #     fn get(&self, field: &str) -> Option<String> {
/// #         match field {
/// #             "title" => self.title.clone(),
/// #             "slug" => self.slug.clone(),
/// #             _ => None,
/// #         }
/// #     }
/// #     fn set(&mut self, field: &str, value: Option<String>) {
/// #         if field == "slug" {
/// #             self.slug = value;
/// #         }
/// #     }
/// #     fn is_new(&self) -> bool {
/// #         true
/// #     }
/// #     fn id(&self) -> Option<RecordId> {
/// #         None
/// #     }
/// # }
///
/// let settings = SlugSettings::new("Post", vec!["title".to_string()]);
/// let lifecycle = SlugLifecycle::new(settings, FixedBudget(100), slugtrail::assign::never_exists);
/// let mut ledger = RedirectLedger::new(MemoryRedirectStore::new());
///
/// let mut post = Post { title: Some("Hello World".to_string()), ..Post::default() };
/// let slug = lifecycle.apply(&mut post, &mut ledger).unwrap();
/// assert_eq!(slug.unwrap().as_str(), "hello-world");
/// assert_eq!(post.slug.as_deref(), Some("hello-world"));
/// ```
#[derive(Debug)]
pub struct SlugLifecycle<B: SchemaBudget, P: UniquenessProbe> {
    settings: SlugSettings,
    assigner: SlugAssigner,
    budget: B,
    probe: P,
}

impl<B: SchemaBudget, P: UniquenessProbe> SlugLifecycle<B, P> {
    /// Creates a lifecycle from settings, a length budget, and a probe.
    ///
    /// The normalizer follows the settings' transliteration override when
    /// present, the compiled-in default otherwise.
    pub fn new(settings: SlugSettings, budget: B, probe: P) -> Self {
        let normalizer = match settings.transliterate() {
            Some(enabled) => Normalizer::with_transliteration(enabled),
            None => Normalizer::new(),
        };
        let assigner = SlugAssigner::new(normalizer, settings.unique());
        Self {
            settings,
            assigner,
            budget,
            probe,
        }
    }

    /// Returns the settings this lifecycle was built from.
    pub fn settings(&self) -> &SlugSettings {
        &self.settings
    }

    /// Returns the assigner, for hosts that need one-off assignments.
    pub fn assigner(&self) -> &SlugAssigner {
        &self.assigner
    }

    /// Runs the slug lifecycle against a record, pre-persistence.
    ///
    /// Short-circuits to `Ok(None)` when the guard blocks regeneration,
    /// leaving the record untouched. Otherwise the tracked fields are
    /// normalized; if the stored slug already equals that value nothing is
    /// written and the stored slug comes back. A changed value runs the
    /// assigner and writes the result through [`NormalizingRecord`]. For a
    /// persisted record whose stored slug differs from the one assigned,
    /// the move is booked in the ledger so the old slug keeps resolving.
    ///
    /// # Errors
    ///
    /// Propagates probe and ledger store failures unchanged.
    pub fn apply<R, S>(
        &self,
        record: &mut R,
        ledger: &mut RedirectLedger<S>,
    ) -> StoreResult<Option<Slug>>
    where
        R: SlugRecord,
        S: RedirectStore,
    {
        if !self.settings.guard().allows(&*record) {
            return Ok(None);
        }

        let current = self
            .assigner
            .normalizer()
            .normalize(&self.base_text(&*record));
        let former = self.stored_slug(&*record);

        // Unchanged sources: keep the stored slug as-is.
        if former.as_ref() == Some(&current) {
            return Ok(Some(current));
        }

        let scope = self.scope_values(&*record);
        let exclude = record.id();
        let request = AssignRequest {
            base_text: current.as_str(),
            budget: self.budget.max_length(self.settings.slug_field()),
            scope: &scope,
            exclude: exclude.as_ref(),
        };
        let assigned = self.assigner.assign(&request, &self.probe)?;

        let mut writer = NormalizingRecord::new(
            record,
            self.settings.slug_field(),
            self.assigner.normalizer(),
        );
        writer.set(
            self.settings.slug_field(),
            Some(assigned.as_str().to_string()),
        );

        if !record.is_new()
            && let Some(former) = former
            && former != assigned
        {
            ledger.record_change(self.settings.record_type(), &former, &assigned)?;
        }

        Ok(Some(assigned))
    }

    /// Returns the record's URL token: the stored slug when present, the
    /// raw id otherwise, an empty string for an unsaved record without one.
    pub fn path_segment(&self, record: &dyn SlugRecord) -> String {
        record
            .get(self.settings.slug_field())
            .or_else(|| record.id().map(|id| id.as_str().to_string()))
            .unwrap_or_default()
    }

    fn base_text(&self, record: &dyn SlugRecord) -> String {
        self.settings
            .fields()
            .iter()
            .map(|field| record.get(field).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn stored_slug(&self, record: &dyn SlugRecord) -> Option<Slug> {
        record
            .get(self.settings.slug_field())
            .and_then(|raw| Slug::new(&raw).ok())
    }

    fn scope_values(&self, record: &dyn SlugRecord) -> Vec<ScopeValue> {
        self.settings
            .scope()
            .iter()
            .map(|field| ScopeValue::new(field.as_str(), record.get(field)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::never_exists;
    use crate::domain::{Guard, RecordId};
    use crate::ledger::{MemoryRedirectStore, StoreError};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::collections::HashMap;

    // ===========================================
    // Test Helpers
    // ===========================================

    #[derive(Default)]
    struct MockRecord {
        attrs: HashMap<String, String>,
        id: Option<RecordId>,
    }

    impl MockRecord {
        fn new() -> Self {
            Self::default()
        }

        fn persisted(id: i64) -> Self {
            Self {
                attrs: HashMap::new(),
                id: Some(RecordId::from(id)),
            }
        }

        fn with(mut self, field: &str, value: &str) -> Self {
            self.attrs.insert(field.to_string(), value.to_string());
            self
        }
    }

    impl SlugRecord for MockRecord {
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

    fn title_settings() -> SlugSettings {
        SlugSettings::new("Post", vec!["title".to_string()])
    }

    fn ledger() -> RedirectLedger<MemoryRedirectStore> {
        RedirectLedger::new(MemoryRedirectStore::new())
    }

    /// Probe over a fixed occupied set, honoring exclusion by id.
    fn occupied(
        slugs: &'static [&'static str],
    ) -> impl Fn(&Slug, &[ScopeValue], Option<&RecordId>) -> StoreResult<bool> {
        move |candidate: &Slug, _scope: &[ScopeValue], _exclude: Option<&RecordId>| {
            Ok(slugs.iter().any(|s| *s == candidate.as_str()))
        }
    }

    // ===========================================
    // Phase 1: Assignment
    // ===========================================

    #[test]
    fn assigns_on_first_apply() {
        let lifecycle = SlugLifecycle::new(title_settings(), FixedBudget(100), never_exists);
        let mut ledger = ledger();
        let mut record = MockRecord::new().with("title", "My First Post");

        let slug = lifecycle.apply(&mut record, &mut ledger).unwrap();

        assert_eq!(slug.unwrap().as_str(), "my-first-post");
        assert_eq!(record.get("slug").as_deref(), Some("my-first-post"));
    }

    #[test]
    fn joins_tracked_fields_in_order() {
        let settings = SlugSettings::new(
            "Post",
            vec!["category".to_string(), "title".to_string()],
        );
        let lifecycle = SlugLifecycle::new(settings, FixedBudget(100), never_exists);
        let mut ledger = ledger();
        let mut record = MockRecord::new()
            .with("category", "Tech")
            .with("title", "Deep Dive");

        let slug = lifecycle.apply(&mut record, &mut ledger).unwrap();

        assert_eq!(slug.unwrap().as_str(), "tech-deep-dive");
    }

    #[test]
    fn absent_fields_join_as_empty() {
        let settings = SlugSettings::new(
            "Post",
            vec!["category".to_string(), "title".to_string()],
        );
        let lifecycle = SlugLifecycle::new(settings, FixedBudget(100), never_exists);
        let mut ledger = ledger();
        let mut record = MockRecord::new().with("title", "Lonely Title");

        let slug = lifecycle.apply(&mut record, &mut ledger).unwrap();

        assert_eq!(slug.unwrap().as_str(), "lonely-title");
    }

    #[test]
    fn collisions_get_a_numeric_suffix() {
        let lifecycle = SlugLifecycle::new(
            title_settings(),
            FixedBudget(100),
            occupied(&["my-post", "my-post-2"]),
        );
        let mut ledger = ledger();
        let mut record = MockRecord::new().with("title", "My Post");

        let slug = lifecycle.apply(&mut record, &mut ledger).unwrap();

        assert_eq!(slug.unwrap().as_str(), "my-post-3");
    }

    #[test]
    fn budget_comes_from_the_schema() {
        let settings = SlugSettings::builder("Post", vec!["title".to_string()])
            .unique(false)
            .build();
        let lifecycle = SlugLifecycle::new(settings, FixedBudget(2), never_exists);
        let mut ledger = ledger();
        let mut record = MockRecord::new().with("title", "BOO");

        let slug = lifecycle.apply(&mut record, &mut ledger).unwrap();

        assert_eq!(slug.unwrap().as_str(), "bo");
    }

    #[test]
    fn empty_sources_assign_a_fallback_token() {
        let lifecycle = SlugLifecycle::new(title_settings(), FixedBudget(0), never_exists);
        let mut ledger = ledger();
        let mut record = MockRecord::new();

        let slug = lifecycle.apply(&mut record, &mut ledger).unwrap().unwrap();

        assert_eq!(slug.as_str().len(), 64);
        assert!(slug.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    // ===========================================
    // Phase 2: Guards
    // ===========================================

    #[test]
    fn guard_flag_false_short_circuits() {
        let settings = SlugSettings::builder("Post", vec!["title".to_string()])
            .guard(Guard::Flag(false))
            .build();
        let lifecycle = SlugLifecycle::new(settings, FixedBudget(100), never_exists);
        let mut ledger = ledger();
        let mut record = MockRecord::new().with("title", "My Post");

        let slug = lifecycle.apply(&mut record, &mut ledger).unwrap();

        assert_eq!(slug, None);
        assert_eq!(record.get("slug"), None);
    }

    #[test]
    fn guard_predicate_reads_the_record() {
        let settings = SlugSettings::builder("Post", vec!["title".to_string()])
            .guard(Guard::unless(|record| record.get("locked").is_some()))
            .build();
        let lifecycle = SlugLifecycle::new(settings, FixedBudget(100), never_exists);
        let mut ledger = ledger();

        let mut locked = MockRecord::new().with("title", "My Post").with("locked", "1");
        assert_eq!(lifecycle.apply(&mut locked, &mut ledger).unwrap(), None);

        let mut open = MockRecord::new().with("title", "My Post");
        assert!(lifecycle.apply(&mut open, &mut ledger).unwrap().is_some());
    }

    // ===========================================
    // Phase 3: Idempotent Re-Application
    // ===========================================

    #[test]
    fn unchanged_sources_skip_regeneration() {
        let calls = Cell::new(0usize);
        let probe = |_: &Slug, _: &[ScopeValue], _: Option<&RecordId>| {
            calls.set(calls.get() + 1);
            Ok(false)
        };
        let lifecycle = SlugLifecycle::new(title_settings(), FixedBudget(100), &probe);
        let mut ledger = ledger();
        let mut record = MockRecord::persisted(1)
            .with("title", "Hello World")
            .with("slug", "hello-world");

        let slug = lifecycle.apply(&mut record, &mut ledger).unwrap();

        assert_eq!(slug.unwrap().as_str(), "hello-world");
        assert_eq!(calls.get(), 0);
        assert!(ledger.store().is_empty());
    }

    #[test]
    fn suffixed_slug_survives_reapply_without_growth() {
        // "bar" is taken by someone else; "bar-2" belongs to this record.
        let probe = |candidate: &Slug, _: &[ScopeValue], exclude: Option<&RecordId>| {
            Ok(match candidate.as_str() {
                "foo" | "bar" => true,
                "bar-2" => !matches!(exclude, Some(id) if id.as_str() == "2"),
                _ => false,
            })
        };
        let lifecycle = SlugLifecycle::new(title_settings(), FixedBudget(100), probe);
        let mut ledger = ledger();
        let mut record = MockRecord::persisted(2)
            .with("title", "bar")
            .with("slug", "bar-2");

        let slug = lifecycle.apply(&mut record, &mut ledger).unwrap();

        assert_eq!(slug.unwrap().as_str(), "bar-2");
        assert_eq!(record.get("slug").as_deref(), Some("bar-2"));
        assert!(ledger.store().is_empty());
    }

    // ===========================================
    // Phase 4: Redirect Bookkeeping
    // ===========================================

    #[test]
    fn rename_books_a_redirect() {
        let lifecycle = SlugLifecycle::new(title_settings(), FixedBudget(100), never_exists);
        let mut ledger = ledger();
        let mut record = MockRecord::persisted(1)
            .with("title", "New Title")
            .with("slug", "old-title");

        let slug = lifecycle.apply(&mut record, &mut ledger).unwrap();

        assert_eq!(slug.unwrap().as_str(), "new-title");
        assert_eq!(
            ledger.lookup("Post", "old-title").unwrap().unwrap().as_str(),
            "new-title"
        );
    }

    #[test]
    fn new_records_never_book_redirects() {
        let lifecycle = SlugLifecycle::new(title_settings(), FixedBudget(100), never_exists);
        let mut ledger = ledger();
        let mut record = MockRecord::new()
            .with("title", "Real Title")
            .with("slug", "draft-slug");

        let slug = lifecycle.apply(&mut record, &mut ledger).unwrap();

        assert_eq!(slug.unwrap().as_str(), "real-title");
        assert!(ledger.store().is_empty());
    }

    #[test]
    fn garbage_stored_slugs_count_as_absent() {
        let lifecycle = SlugLifecycle::new(title_settings(), FixedBudget(100), never_exists);
        let mut ledger = ledger();
        let mut record = MockRecord::persisted(1)
            .with("title", "My Post")
            .with("slug", "Not A Slug!");

        let slug = lifecycle.apply(&mut record, &mut ledger).unwrap();

        assert_eq!(slug.unwrap().as_str(), "my-post");
        assert!(ledger.store().is_empty());
    }

    // ===========================================
    // Phase 5: Scope
    // ===========================================

    #[test]
    fn scope_values_are_read_off_the_record() {
        let calls = Cell::new(0usize);
        let probe = |_: &Slug, scope: &[ScopeValue], _: Option<&RecordId>| {
            calls.set(calls.get() + 1);
            assert_eq!(scope.len(), 2);
            assert_eq!(scope[0].field(), "blog_id");
            assert_eq!(scope[0].value(), Some("7"));
            assert_eq!(scope[1].field(), "section");
            assert_eq!(scope[1].value(), None);
            Ok(false)
        };
        let settings = SlugSettings::builder("Post", vec!["title".to_string()])
            .scope(vec!["blog_id".to_string(), "section".to_string()])
            .build();
        let lifecycle = SlugLifecycle::new(settings, FixedBudget(100), &probe);
        let mut ledger = ledger();
        let mut record = MockRecord::new().with("title", "My Post").with("blog_id", "7");

        lifecycle.apply(&mut record, &mut ledger).unwrap();

        assert_eq!(calls.get(), 1);
    }

    // ===========================================
    // Phase 6: Errors
    // ===========================================

    #[test]
    fn probe_failures_propagate() {
        let probe = |_: &Slug, _: &[ScopeValue], _: Option<&RecordId>| -> StoreResult<bool> {
            Err(StoreError::Probe("index offline".to_string()))
        };
        let lifecycle = SlugLifecycle::new(title_settings(), FixedBudget(100), probe);
        let mut ledger = ledger();
        let mut record = MockRecord::new().with("title", "My Post");

        let err = lifecycle.apply(&mut record, &mut ledger).unwrap_err();

        assert!(matches!(err, StoreError::Probe(msg) if msg == "index offline"));
    }

    // ===========================================
    // Phase 7: Path Segments
    // ===========================================

    #[test]
    fn path_segment_prefers_the_slug() {
        let lifecycle = SlugLifecycle::new(title_settings(), FixedBudget(100), never_exists);

        let with_slug = MockRecord::persisted(42).with("slug", "deep-thought");
        assert_eq!(lifecycle.path_segment(&with_slug), "deep-thought");

        let without_slug = MockRecord::persisted(42);
        assert_eq!(lifecycle.path_segment(&without_slug), "42");

        let brand_new = MockRecord::new();
        assert_eq!(lifecycle.path_segment(&brand_new), "");
    }
}

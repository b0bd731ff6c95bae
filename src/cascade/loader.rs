//! Level loading
//!
//! Fetch the options of one level and rebuild exactly one select from the
//! result. A lookup is tagged with the parent id it was keyed by; when it
//! completes, the tag is compared with the parent select's live selection
//! and the result is dropped if they differ. Superseded lookups are never
//! cancelled, only ignored.

use crate::errors::LookupError;
use crate::models::{FieldHandle, GeoLevel, OptionId, OptionItem, Page};
use crate::provider::GeoProvider;

use super::GeoSync;

/// How a level load ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The options were replaced; `selected` is true when the requested
    /// preselection was among them
    Applied { selected: bool },
    /// The lookup succeeded with no items: only the placeholder is shown
    Empty,
    /// No parent is chosen, so nothing was fetched
    Skipped,
    /// The parent selection changed while the lookup was in flight
    Superseded,
    /// The lookup failed; the select keeps its placeholder state
    Failed(LookupError),
    /// The target select is not on the page
    MissingTarget,
}

impl LoadOutcome {
    /// Whether the target now shows the requested preselection
    pub fn is_selected(&self) -> bool {
        matches!(self, LoadOutcome::Applied { selected: true })
    }
}

impl<P: GeoProvider> GeoSync<P> {
    /// Populate `target` with the options of its level for `parent`.
    ///
    /// Countries ignore `parent`. Any other level with an empty parent is
    /// left untouched and nothing is fetched. When `preselect` is among the
    /// returned items it becomes the selection; otherwise the placeholder
    /// stays selected. Failures are logged and never propagate.
    pub async fn load_level(
        &self,
        target: &FieldHandle,
        parent: Option<&OptionId>,
        preselect: Option<&OptionId>,
    ) -> LoadOutcome {
        self.fetch_into(target, parent, None, preselect).await
    }

    /// `load_level` keyed by `parent`, applied as long as the parent select
    /// still shows `expected`. The two differ when the key is a stored id
    /// that the parent select no longer offers.
    pub(crate) async fn load_level_expecting(
        &self,
        target: &FieldHandle,
        parent: Option<&OptionId>,
        expected: Option<&OptionId>,
        preselect: Option<&OptionId>,
    ) -> LoadOutcome {
        self.fetch_into(target, parent, Some(expected), preselect).await
    }

    async fn fetch_into(
        &self,
        target: &FieldHandle,
        parent: Option<&OptionId>,
        expected: Option<Option<&OptionId>>,
        preselect: Option<&OptionId>,
    ) -> LoadOutcome {
        let level = target.level;
        let parent = match level {
            GeoLevel::Country => None,
            _ => match parent.filter(|id| !id.is_empty()) {
                Some(id) => Some(id.clone()),
                None => {
                    log::debug!("{} for '{}' has no parent selected, not loading", level, target.scope);
                    return LoadOutcome::Skipped;
                }
            },
        };
        let expected = expected.unwrap_or(parent.as_ref());

        let dispatched = match self.page.borrow_mut().select_mut(target) {
            Some(field) => {
                field.begin_fetch(parent.clone());
                true
            }
            None => false,
        };
        if !dispatched {
            log::error!("no {} select in '{}'", level, target.scope);
            return LoadOutcome::MissingTarget;
        }
        self.commit();

        let result = self.provider.fetch_level(level, parent.as_ref()).await;

        let outcome = settle(
            &mut self.page.borrow_mut(),
            target,
            parent.as_ref(),
            expected,
            preselect,
            result,
        );
        self.commit();
        outcome
    }
}

/// Whether the parent select still shows what it showed at dispatch
fn is_current(page: &Page, target: &FieldHandle, expected: Option<&OptionId>) -> bool {
    match target.parent().and_then(|handle| page.select(&handle)) {
        Some(parent_field) => parent_field.selected() == expected,
        // countries, or a form without the parent select
        None => true,
    }
}

fn settle(
    page: &mut Page,
    target: &FieldHandle,
    parent: Option<&OptionId>,
    expected: Option<&OptionId>,
    preselect: Option<&OptionId>,
    result: Result<Vec<OptionItem>, LookupError>,
) -> LoadOutcome {
    let level = target.level;
    let parent_label = parent.map(OptionId::as_str).unwrap_or("-");

    if !is_current(page, target, expected) {
        log::debug!(
            "discarding {} options for parent {} in '{}': selection changed",
            level,
            parent_label,
            target.scope
        );
        // settle our own tag only; a newer lookup may own the field by now
        if let Some(field) = page.select_mut(target) {
            if field.pending().map(|pending| pending.parent.as_ref()) == Some(parent) {
                field.end_fetch();
            }
        }
        return LoadOutcome::Superseded;
    }

    let Some(field) = page.select_mut(target) else {
        return LoadOutcome::MissingTarget;
    };

    match result {
        Err(error) => {
            field.end_fetch();
            log::error!("failed to load {} options for parent {}: {}", level, parent_label, error);
            LoadOutcome::Failed(error)
        }
        Ok(items) if items.is_empty() => {
            field.replace_options(items, None);
            log::warn!("no {} options found for parent {}", level, parent_label);
            LoadOutcome::Empty
        }
        Ok(items) => {
            let count = items.len();
            let selected = field.replace_options(items, preselect);
            log::debug!("loaded {} {} options into '{}'", count, level, target.scope);
            LoadOutcome::Applied { selected }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeoConfig;
    use crate::models::{FormInstance, ScopeId, SelectField};
    use crate::provider::{LookupRequest, StaticProvider};
    use futures::executor::block_on;

    fn sync(provider: StaticProvider) -> GeoSync<StaticProvider> {
        let config = GeoConfig::default();
        let mut form = FormInstance::new("a");
        for level in GeoLevel::ALL {
            form.insert_select(SelectField::new(level, config.placeholder(level)));
        }
        let mut page = Page::new();
        page.add_form(form);
        GeoSync::new(page, provider, config)
    }

    fn handle(level: GeoLevel) -> FieldHandle {
        FieldHandle::new("a", level)
    }

    #[test]
    fn test_country_load_ignores_parent() {
        let provider = StaticProvider::new().with_countries(vec![OptionItem::new("MX", "México")]);
        let sync = sync(provider);

        let outcome = block_on(sync.load_level(&handle(GeoLevel::Country), Some(&"junk".into()), None));
        assert_eq!(outcome, LoadOutcome::Applied { selected: false });
        assert_eq!(sync.provider().requests(), vec![LookupRequest::level(GeoLevel::Country, None)]);

        let page = sync.page();
        let field = page.select(&handle(GeoLevel::Country)).unwrap();
        assert_eq!(field.options().len(), 2);
        assert!(field.is_enabled());
    }

    #[test]
    fn test_empty_parent_skips_fetch() {
        let sync = sync(StaticProvider::new());
        let outcome = block_on(sync.load_level(&handle(GeoLevel::State), Some(&OptionId::empty()), None));
        assert_eq!(outcome, LoadOutcome::Skipped);
        let outcome = block_on(sync.load_level(&handle(GeoLevel::State), None, None));
        assert_eq!(outcome, LoadOutcome::Skipped);
        assert_eq!(sync.provider().request_count(), 0);
    }

    #[test]
    fn test_failure_leaves_placeholder() {
        let provider = StaticProvider::new()
            .with_countries(vec![OptionItem::new("MX", "México")])
            .failing(
                LookupRequest::level(GeoLevel::Country, None),
                LookupError::BadStatus { status: 500, url: "/get-paises".into() },
            );
        let sync = sync(provider);

        let outcome = block_on(sync.load_level(&handle(GeoLevel::Country), None, None));
        assert!(matches!(outcome, LoadOutcome::Failed(LookupError::BadStatus { status: 500, .. })));
        let page = sync.page();
        let field = page.select(&handle(GeoLevel::Country)).unwrap();
        assert!(field.is_reset());
        assert!(field.is_enabled());
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let sync = sync(StaticProvider::new());
        sync.update(|page| {
            let country = page.select_mut(&handle(GeoLevel::Country)).unwrap();
            country.replace_options(vec![OptionItem::new("AQ", "Antarctica")], Some(&"AQ".into()));
        });

        let outcome = block_on(sync.load_level(&handle(GeoLevel::State), Some(&"AQ".into()), None));
        assert_eq!(outcome, LoadOutcome::Empty);
        assert!(sync.page().select(&handle(GeoLevel::State)).unwrap().is_reset());
    }

    #[test]
    fn test_missing_target() {
        let mut page = Page::new();
        page.add_form(FormInstance::new("b"));
        let sync = GeoSync::new(page, StaticProvider::new(), GeoConfig::default());
        let outcome = block_on(sync.load_level(&FieldHandle::new(ScopeId::from("b"), GeoLevel::Country), None, None));
        assert_eq!(outcome, LoadOutcome::MissingTarget);
        assert_eq!(sync.provider().request_count(), 0);
    }

    #[test]
    fn test_stored_key_applies_while_parent_shows_expected() {
        let provider = StaticProvider::new()
            .with_children(GeoLevel::Municipality, "OLD", vec![OptionItem::new("GDL", "Guadalajara")]);
        let sync = sync(provider);
        // the state select offers nothing for the stored id, so it shows no choice
        let outcome = block_on(sync.load_level_expecting(
            &handle(GeoLevel::Municipality),
            Some(&"OLD".into()),
            None,
            Some(&"GDL".into()),
        ));
        assert_eq!(outcome, LoadOutcome::Applied { selected: true });
        assert_eq!(
            sync.provider().requests(),
            vec![LookupRequest::level(GeoLevel::Municipality, Some("OLD"))]
        );
    }

    #[test]
    fn test_stored_key_discarded_once_parent_changes() {
        let provider = StaticProvider::new()
            .with_children(GeoLevel::Municipality, "OLD", vec![OptionItem::new("GDL", "Guadalajara")]);
        let sync = sync(provider);
        sync.update(|page| {
            let state = page.select_mut(&handle(GeoLevel::State)).unwrap();
            state.replace_options(vec![OptionItem::new("NL", "Nuevo León")], Some(&"NL".into()));
        });

        let outcome = block_on(sync.load_level_expecting(
            &handle(GeoLevel::Municipality),
            Some(&"OLD".into()),
            None,
            Some(&"GDL".into()),
        ));
        assert_eq!(outcome, LoadOutcome::Superseded);
        assert!(sync.page().select(&handle(GeoLevel::Municipality)).unwrap().is_reset());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let provider = StaticProvider::new()
            .with_children(GeoLevel::State, "MX", vec![OptionItem::new("JAL", "Jalisco")]);
        let sync = sync(provider);
        // the parent select shows nothing chosen, so a result keyed by MX is stale
        let outcome = block_on(sync.load_level(&handle(GeoLevel::State), Some(&"MX".into()), None));
        assert_eq!(outcome, LoadOutcome::Superseded);
        let page = sync.page();
        let state = page.select(&handle(GeoLevel::State)).unwrap();
        assert_eq!(state.options().len(), 1);
        assert!(state.is_enabled());
    }
}

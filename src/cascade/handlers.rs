//! Selection-change handlers
//!
//! A change at country, state or municipality resets every level below it
//! in the same form instance and reloads the next level keyed by the new
//! value. A form is `Cascading` while any of its reloads is in flight and
//! returns to `Idle` once they settle.

use crate::errors::SyncError;
use crate::models::{FieldHandle, GeoLevel, OptionId, ScopeId};
use crate::provider::GeoProvider;

use super::loader::LoadOutcome;
use super::GeoSync;

/// How a selection change was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeOutcome {
    /// The dependent levels were reset and the next level loaded
    Loaded(LoadOutcome),
    /// The dependent levels were reset; nothing to load (empty value, or a
    /// form without the next select)
    Reset,
    /// A neighborhood change: nothing depends on it
    Leaf,
    /// The handler could not run
    Aborted(SyncError),
}

/// Keeps a form `Cascading` for as long as it is alive
struct CascadeGuard<'a, P: GeoProvider> {
    sync: &'a GeoSync<P>,
    scope: ScopeId,
}

impl<'a, P: GeoProvider> CascadeGuard<'a, P> {
    fn enter(sync: &'a GeoSync<P>, scope: &ScopeId) -> Self {
        if let Some(form) = sync.page.borrow_mut().form_mut(scope) {
            form.begin_cascade();
        }
        Self {
            sync,
            scope: scope.clone(),
        }
    }
}

impl<P: GeoProvider> Drop for CascadeGuard<'_, P> {
    fn drop(&mut self) {
        match self.sync.page.try_borrow_mut() {
            Ok(mut page) => {
                if let Some(form) = page.form_mut(&self.scope) {
                    form.end_cascade();
                }
            }
            Err(_) => {
                log::warn!("page busy when the '{}' cascade ended, settling on next commit", self.scope);
                self.sync.unsettled.borrow_mut().push(self.scope.clone());
            }
        }
    }
}

impl<P: GeoProvider> GeoSync<P> {
    /// Handle a new value chosen at `level` in `scope`. The empty value
    /// (the placeholder) counts as "nothing chosen".
    pub async fn on_selection_change(&self, scope: &ScopeId, level: GeoLevel, value: Option<OptionId>) -> CascadeOutcome {
        let value = value.and_then(OptionId::non_empty);

        if self.page().form(scope).is_none() {
            let error = SyncError::UnknownScope(scope.clone());
            log::error!("{} change ignored: {}", level, error);
            return CascadeOutcome::Aborted(error);
        }

        self.update(|page| {
            if let Some(field) = page.select_mut(&FieldHandle::new(scope.clone(), level)) {
                field.select(value.clone());
            }
        });

        let Some(child) = level.child() else {
            return CascadeOutcome::Leaf;
        };

        let _cascading = CascadeGuard::enter(self, scope);
        if let Err(error) = self.reset_from(scope, child) {
            return CascadeOutcome::Aborted(error);
        }

        let Some(value) = value else {
            log::info!("no {} selected in '{}', dependent selects reset", level, scope);
            return CascadeOutcome::Reset;
        };

        let target = FieldHandle::new(scope.clone(), child);
        if self.page().select(&target).is_none() {
            log::warn!("'{}' has no {} select to load", scope, child);
            return CascadeOutcome::Reset;
        }

        CascadeOutcome::Loaded(self.load_level(&target, Some(&value), None).await)
    }

    pub async fn on_country_change(&self, scope: &ScopeId, value: Option<OptionId>) -> CascadeOutcome {
        self.on_selection_change(scope, GeoLevel::Country, value).await
    }

    pub async fn on_state_change(&self, scope: &ScopeId, value: Option<OptionId>) -> CascadeOutcome {
        self.on_selection_change(scope, GeoLevel::State, value).await
    }

    pub async fn on_municipality_change(&self, scope: &ScopeId, value: Option<OptionId>) -> CascadeOutcome {
        self.on_selection_change(scope, GeoLevel::Municipality, value).await
    }
}

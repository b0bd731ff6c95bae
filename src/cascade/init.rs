//! Initial page load
//!
//! Every form instance starts with its dependent selects reset and its
//! country list loaded. Form instances load concurrently; none of them
//! waits on another.

use futures::future::join_all;

use crate::models::{FieldHandle, GeoLevel, ScopeId};
use crate::provider::GeoProvider;

use super::loader::LoadOutcome;
use super::GeoSync;

impl<P: GeoProvider> GeoSync<P> {
    /// Reset and load the country list of each given form instance.
    /// Scopes that are not on the page are skipped, as are forms without a
    /// country select.
    pub async fn init_selects<I>(&self, scopes: I) -> Vec<(ScopeId, LoadOutcome)>
    where
        I: IntoIterator<Item = ScopeId>,
    {
        let scopes: Vec<ScopeId> = scopes
            .into_iter()
            .filter(|scope| {
                let known = self.page().form(scope).is_some();
                if !known {
                    log::debug!("container '{}' is not on this page", scope);
                }
                known
            })
            .collect();

        let loads = scopes.into_iter().map(|scope| async move {
            if let Err(error) = self.reset_from(&scope, GeoLevel::State) {
                log::error!("could not reset '{}': {}", scope, error);
            }

            let target = FieldHandle::new(scope.clone(), GeoLevel::Country);
            let outcome = if self.page().select(&target).is_some() {
                self.load_level(&target, None, None).await
            } else {
                LoadOutcome::MissingTarget
            };
            (scope, outcome)
        });

        join_all(loads).await
    }

    /// `init_selects` over every form instance on the page
    pub async fn init_all(&self) -> Vec<(ScopeId, LoadOutcome)> {
        let scopes: Vec<ScopeId> = self.page().scopes().cloned().collect();
        self.init_selects(scopes).await
    }
}

//! Downward invalidation
//!
//! Changing the selection at level L invalidates every level below L. This
//! module is the only place that rule is written down.

use crate::errors::SyncError;
use crate::models::{FieldHandle, GeoLevel, Page, ScopeId};

use super::GeoSync;
use crate::provider::GeoProvider;

/// Reset every select at `level` or below in `scope` to placeholder-only,
/// nothing chosen, enabled. Levels without a select are skipped.
///
/// Returns the levels that were reset.
pub fn reset_from(page: &mut Page, scope: &ScopeId, level: GeoLevel) -> Result<Vec<GeoLevel>, SyncError> {
    if page.form(scope).is_none() {
        return Err(SyncError::UnknownScope(scope.clone()));
    }

    let mut touched = Vec::new();
    for level in level.and_below() {
        if let Some(field) = page.select_mut(&FieldHandle::new(scope.clone(), level)) {
            field.reset();
            touched.push(level);
        }
    }
    Ok(touched)
}

impl<P: GeoProvider> GeoSync<P> {
    /// Reset `scope` from `level` down and push the result to the observer
    pub fn reset_from(&self, scope: &ScopeId, level: GeoLevel) -> Result<Vec<GeoLevel>, SyncError> {
        let touched = reset_from(&mut self.page.borrow_mut(), scope, level);
        self.commit();
        if let Ok(levels) = &touched {
            log::debug!("reset {} from {}: {:?}", scope, level, levels);
        }
        touched
    }
}

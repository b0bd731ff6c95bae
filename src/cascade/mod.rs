//! Dependent-select cascades
//!
//! `GeoSync` owns the page model and a lookup provider and implements the
//! four operations on top of them:
//!
//! - `reset`: downward invalidation of a form instance's selects
//! - `loader`: populate one select from a lookup, discarding stale results
//! - `handlers`: selection-change handling per form instance
//! - `reconcile`: fill every level from a stored address record
//!
//! plus `init` for the initial country load of a page.
//!
//! All work runs on one thread. Lookups suspend only the handler that issued
//! them; the page is borrowed only between awaits, never across one.

pub mod reset;
pub mod loader;
pub mod handlers;
pub mod reconcile;
pub mod init;

pub use handlers::CascadeOutcome;
pub use loader::LoadOutcome;
pub use reconcile::{NeighborhoodResolution, ReconcileOutcome, ReconcileStep, ReconcileTargets};
pub use reset::reset_from;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::config::GeoConfig;
use crate::models::{FieldAddress, Page, ScopeId};
use crate::provider::GeoProvider;

/// Receives every field mutation once it is committed, e.g. to render it
pub trait FieldObserver {
    fn field_changed(&self, page: &Page, address: &FieldAddress);
}

pub struct GeoSync<P> {
    page: Rc<RefCell<Page>>,
    provider: P,
    config: GeoConfig,
    observer: Option<Rc<dyn FieldObserver>>,
    /// Forms whose cascade ended while the page was borrowed; settled on
    /// the next commit
    unsettled: RefCell<Vec<ScopeId>>,
}

impl<P: GeoProvider> GeoSync<P> {
    pub fn new(page: Page, provider: P, config: GeoConfig) -> Self {
        Self {
            page: Rc::new(RefCell::new(page)),
            provider,
            config,
            observer: None,
            unsettled: RefCell::new(Vec::new()),
        }
    }

    pub fn with_observer(mut self, observer: Rc<dyn FieldObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Read access to the page model
    pub fn page(&self) -> Ref<'_, Page> {
        self.page.borrow()
    }

    /// Mutate the page model directly (registration, user input). Changes
    /// are pushed to the observer before this returns.
    pub fn update<R>(&self, f: impl FnOnce(&mut Page) -> R) -> R {
        let result = f(&mut self.page.borrow_mut());
        self.commit();
        result
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    /// Push pending field changes to the observer
    pub(crate) fn commit(&self) {
        let dirty = {
            let mut page = self.page.borrow_mut();
            for scope in self.unsettled.borrow_mut().drain(..) {
                if let Some(form) = page.form_mut(&scope) {
                    form.end_cascade();
                }
            }
            page.take_dirty()
        };
        if let Some(observer) = &self.observer {
            let page = self.page.borrow();
            for address in &dirty {
                observer.field_changed(&page, address);
            }
        }
    }
}

//! DOM binding
//!
//! Connects the page model to real markup: scope resolution over
//! `web_sys::Element`, discovery of the selects and inputs of each form
//! instance, and rendering of field state back into the elements.

pub mod mount;
pub mod render;

pub use mount::{ensure_select, mount_page, register_select, register_text, SCOPE_ATTR};
pub use render::DomRenderer;

use web_sys::Element;

use crate::models::ScopeId;
use crate::scope::ScopeNode;

impl ScopeNode for Element {
    fn parent(&self) -> Option<Self> {
        self.parent_element()
    }

    fn is_attached(&self) -> bool {
        self.is_connected()
    }

    fn tag_name(&self) -> String {
        Element::tag_name(self).to_ascii_uppercase()
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn scope_id(&self) -> Option<ScopeId> {
        self.get_attribute(SCOPE_ATTR)
            .or_else(|| Some(self.id()).filter(|id| !id.is_empty()))
            .map(ScopeId::from)
    }
}

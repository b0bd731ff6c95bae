//! Page model
//!
//! The WASM-owned source of truth for every address block on the page.
//! Fields are reachable two ways, which resolve to the same handle:
//! by (scope, level) for cascades and by stable element id for
//! reconciliation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::field::{SelectField, TextField, TextKind};
use super::form::{FormInstance, ScopeId};
use super::level::GeoLevel;

/// Address of a select: its form instance and its level
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldHandle {
    pub scope: ScopeId,
    pub level: GeoLevel,
}

impl FieldHandle {
    pub fn new(scope: impl Into<ScopeId>, level: GeoLevel) -> Self {
        Self {
            scope: scope.into(),
            level,
        }
    }

    /// The handle of the select whose selection keys this one
    pub fn parent(&self) -> Option<FieldHandle> {
        self.level.parent().map(|level| FieldHandle::new(self.scope.clone(), level))
    }
}

/// Address of a text input
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextHandle {
    pub scope: ScopeId,
    pub kind: TextKind,
}

/// Any addressable field
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldAddress {
    Select(FieldHandle),
    Text(TextHandle),
}

#[derive(Clone, Debug, Default)]
pub struct Page {
    forms: BTreeMap<ScopeId, FormInstance>,
    ids: HashMap<String, FieldAddress>,
    /// Fields mutated since the last `take_dirty`
    dirty: BTreeSet<FieldAddress>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a form instance, indexing the stable ids of its fields.
    /// An instance with the same scope id is replaced.
    pub fn add_form(&mut self, form: FormInstance) {
        if let Some(previous) = self.forms.remove(&form.id) {
            self.ids.retain(|_, address| address_scope(address) != &previous.id);
        }
        for field in form.selects() {
            if let Some(id) = field.element_id() {
                let handle = FieldHandle::new(form.id.clone(), field.level());
                self.ids.insert(id.to_string(), FieldAddress::Select(handle));
            }
        }
        for field in form.texts() {
            let handle = TextHandle {
                scope: form.id.clone(),
                kind: field.kind,
            };
            self.ids.insert(field.element_id.clone(), FieldAddress::Text(handle));
        }
        self.forms.insert(form.id.clone(), form);
    }

    /// Add a select to a (possibly new) form instance
    pub fn add_select(&mut self, scope: &ScopeId, field: SelectField) -> FieldHandle {
        let handle = FieldHandle::new(scope.clone(), field.level());
        if let Some(id) = field.element_id() {
            self.ids.insert(id.to_string(), FieldAddress::Select(handle.clone()));
        }
        self.form_entry(scope).insert_select(field);
        handle
    }

    /// Add a text input to a (possibly new) form instance
    pub fn add_text(&mut self, scope: &ScopeId, field: TextField) -> TextHandle {
        let handle = TextHandle {
            scope: scope.clone(),
            kind: field.kind,
        };
        self.ids.insert(field.element_id.clone(), FieldAddress::Text(handle.clone()));
        self.form_entry(scope).insert_text(field);
        handle
    }

    fn form_entry(&mut self, scope: &ScopeId) -> &mut FormInstance {
        self.forms
            .entry(scope.clone())
            .or_insert_with(|| FormInstance::new(scope.clone()))
    }

    pub fn form(&self, scope: &ScopeId) -> Option<&FormInstance> {
        self.forms.get(scope)
    }

    pub(crate) fn form_mut(&mut self, scope: &ScopeId) -> Option<&mut FormInstance> {
        self.forms.get_mut(scope)
    }

    pub fn forms(&self) -> impl Iterator<Item = &FormInstance> {
        self.forms.values()
    }

    pub fn scopes(&self) -> impl Iterator<Item = &ScopeId> {
        self.forms.keys()
    }

    pub fn select(&self, handle: &FieldHandle) -> Option<&SelectField> {
        self.forms.get(&handle.scope).and_then(|form| form.select(handle.level))
    }

    /// Mutable access to a select; the field is marked dirty
    pub fn select_mut(&mut self, handle: &FieldHandle) -> Option<&mut SelectField> {
        let field = self
            .forms
            .get_mut(&handle.scope)
            .and_then(|form| form.select_mut(handle.level))?;
        self.dirty.insert(FieldAddress::Select(handle.clone()));
        Some(field)
    }

    pub fn text(&self, handle: &TextHandle) -> Option<&TextField> {
        self.forms.get(&handle.scope).and_then(|form| form.text(handle.kind))
    }

    /// Mutable access to a text field; the field is marked dirty
    pub fn text_mut(&mut self, handle: &TextHandle) -> Option<&mut TextField> {
        let field = self
            .forms
            .get_mut(&handle.scope)
            .and_then(|form| form.text_mut(handle.kind))?;
        self.dirty.insert(FieldAddress::Text(handle.clone()));
        Some(field)
    }

    pub fn resolve_select(&self, element_id: &str) -> Option<FieldHandle> {
        match self.ids.get(element_id)? {
            FieldAddress::Select(handle) => Some(handle.clone()),
            FieldAddress::Text(_) => None,
        }
    }

    pub fn resolve_text(&self, element_id: &str) -> Option<TextHandle> {
        match self.ids.get(element_id)? {
            FieldAddress::Text(handle) => Some(handle.clone()),
            FieldAddress::Select(_) => None,
        }
    }

    /// Drain the set of fields mutated since the last call
    pub fn take_dirty(&mut self) -> Vec<FieldAddress> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }
}

fn address_scope(address: &FieldAddress) -> &ScopeId {
    match address {
        FieldAddress::Select(handle) => &handle.scope,
        FieldAddress::Text(handle) => &handle.scope,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Page {
        let mut page = Page::new();
        page.add_form(
            FormInstance::new("datos-compania")
                .with_select(SelectField::new(GeoLevel::Country, "c").with_element_id("comp_paises"))
                .with_select(SelectField::new(GeoLevel::Municipality, "m").with_element_id("comp_municipios"))
                .with_text(TextField::new(TextKind::Street, "comp_calle")),
        );
        page
    }

    #[test]
    fn test_stable_id_and_role_resolve_to_same_field() {
        let page = page();
        let by_id = page.resolve_select("comp_municipios").unwrap();
        let by_role = FieldHandle::new("datos-compania", GeoLevel::Municipality);
        assert_eq!(by_id, by_role);
        assert!(page.select(&by_role).is_some());
        assert!(page.resolve_select("comp_calle").is_none());
        assert!(page.resolve_text("comp_calle").is_some());
    }

    #[test]
    fn test_mutable_access_marks_dirty() {
        let mut page = page();
        assert!(page.take_dirty().is_empty());
        let handle = FieldHandle::new("datos-compania", GeoLevel::Country);
        page.select_mut(&handle).unwrap().reset();
        assert_eq!(page.take_dirty(), vec![FieldAddress::Select(handle)]);
        assert!(page.take_dirty().is_empty());

        // a missing field is not marked
        assert!(page.select_mut(&FieldHandle::new("datos-compania", GeoLevel::State)).is_none());
        assert!(page.take_dirty().is_empty());
    }

    #[test]
    fn test_replacing_form_drops_old_ids() {
        let mut page = page();
        page.add_form(FormInstance::new("datos-compania"));
        assert!(page.resolve_select("comp_paises").is_none());
    }
}

//! Select and text field state
//!
//! A `SelectField` is the Rust-owned record behind one `<select>` on the
//! page. Its option list is always the placeholder followed by the most
//! recently applied lookup result; it is replaced wholesale, never patched.

use serde::{Deserialize, Serialize};

use super::level::GeoLevel;
use super::option::{FieldOption, OptionId, OptionItem, OptionKind};

/// Tag of an outstanding lookup for a field: the parent id it was keyed by
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PendingFetch {
    pub parent: Option<OptionId>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SelectField {
    level: GeoLevel,
    /// Stable element id, unique within the page
    element_id: Option<String>,
    options: Vec<FieldOption>,
    selected: Option<OptionId>,
    enabled: bool,
    pending: Option<PendingFetch>,
}

impl SelectField {
    /// Create a field showing only its placeholder
    pub fn new(level: GeoLevel, placeholder: impl Into<String>) -> Self {
        Self {
            level,
            element_id: None,
            options: vec![FieldOption::placeholder(placeholder)],
            selected: None,
            enabled: true,
            pending: None,
        }
    }

    pub fn with_element_id(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = Some(element_id.into());
        self
    }

    pub fn level(&self) -> GeoLevel {
        self.level
    }

    pub fn element_id(&self) -> Option<&str> {
        self.element_id.as_deref()
    }

    pub fn options(&self) -> &[FieldOption] {
        &self.options
    }

    /// Options other than the placeholder
    pub fn items(&self) -> impl Iterator<Item = &FieldOption> {
        self.options.iter().filter(|option| !option.is_placeholder())
    }

    pub fn selected(&self) -> Option<&OptionId> {
        self.selected.as_ref()
    }

    /// The option currently shown as chosen (the placeholder when nothing is)
    pub fn selected_option(&self) -> &FieldOption {
        self.selected
            .as_ref()
            .and_then(|id| self.options.iter().find(|option| &option.id == id))
            .unwrap_or(&self.options[0])
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn pending(&self) -> Option<&PendingFetch> {
        self.pending.as_ref()
    }

    pub fn placeholder_label(&self) -> &str {
        &self.options[0].label
    }

    /// True when only the placeholder is present and nothing is chosen
    pub fn is_reset(&self) -> bool {
        self.options.len() == 1 && self.selected.is_none()
    }

    /// Back to placeholder-only, nothing chosen, enabled
    pub fn reset(&mut self) {
        self.options.truncate(1);
        self.selected = None;
        self.enabled = true;
        self.pending = None;
    }

    /// Record a user choice. The empty id clears the selection.
    pub fn select(&mut self, id: Option<OptionId>) {
        self.selected = id.and_then(OptionId::non_empty);
    }

    /// Mark a lookup as outstanding; the field stays disabled until it settles
    pub fn begin_fetch(&mut self, parent: Option<OptionId>) {
        self.pending = Some(PendingFetch { parent });
        self.enabled = false;
    }

    /// Settle an outstanding lookup without touching the options
    pub fn end_fetch(&mut self) {
        self.pending = None;
        self.enabled = true;
    }

    /// Rebuild the options as `[placeholder, ...items]` in the order given.
    ///
    /// Returns `true` when `preselect` matched one of the items and is now
    /// selected; otherwise the placeholder is selected.
    pub fn replace_options(&mut self, items: Vec<OptionItem>, preselect: Option<&OptionId>) -> bool {
        self.options.truncate(1);
        self.options.extend(items.into_iter().map(FieldOption::fetched));
        self.end_fetch();

        self.selected = preselect
            .filter(|id| self.options.iter().any(|option| !option.is_placeholder() && &option.id == *id))
            .cloned();
        self.selected.is_some()
    }

    /// Append a synthetic option for a stored id that the lookup did not
    /// return, and select it
    pub fn push_orphan(&mut self, id: OptionId, label: &str, marker: &str) {
        self.options.retain(|option| option.kind != OptionKind::Orphan);
        self.options.push(FieldOption::orphan(id.clone(), label, marker));
        self.selected = Some(id);
    }
}

/// Which free-text part of the address a text field holds
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TextKind {
    Street,
    Number,
}

/// A plain input addressed by its stable element id
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TextField {
    pub kind: TextKind,
    pub element_id: String,
    pub value: String,
}

impl TextField {
    pub fn new(kind: TextKind, element_id: impl Into<String>) -> Self {
        Self {
            kind,
            element_id: element_id.into(),
            value: String::new(),
        }
    }
}

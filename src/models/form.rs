//! Form instances
//!
//! One `FormInstance` per independent address block on the page (a tab
//! panel or a form). Instances share nothing; every cascade is confined to
//! the instance its triggering select belongs to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::field::{SelectField, TextField, TextKind};
use super::level::GeoLevel;

/// Identifier of a form instance boundary
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ScopeId(String);

impl ScopeId {
    /// Name of the page-wide fallback scope, used when an element sits
    /// outside every boundary
    pub const PAGE: &'static str = "document";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn page() -> Self {
        Self(Self::PAGE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScopeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ScopeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Cascade state of a form instance
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Cascading,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FormInstance {
    pub id: ScopeId,
    selects: BTreeMap<GeoLevel, SelectField>,
    texts: BTreeMap<TextKind, TextField>,
    /// Selection-change cascades whose lookup has not settled yet
    #[serde(default)]
    outstanding: usize,
}

impl FormInstance {
    pub fn new(id: impl Into<ScopeId>) -> Self {
        Self {
            id: id.into(),
            selects: BTreeMap::new(),
            texts: BTreeMap::new(),
            outstanding: 0,
        }
    }

    /// Builder: add (or replace) the select for a level
    pub fn with_select(mut self, field: SelectField) -> Self {
        self.insert_select(field);
        self
    }

    /// Builder: add (or replace) a text field
    pub fn with_text(mut self, field: TextField) -> Self {
        self.insert_text(field);
        self
    }

    pub fn insert_select(&mut self, field: SelectField) {
        self.selects.insert(field.level(), field);
    }

    pub fn insert_text(&mut self, field: TextField) {
        self.texts.insert(field.kind, field);
    }

    pub fn select(&self, level: GeoLevel) -> Option<&SelectField> {
        self.selects.get(&level)
    }

    pub(crate) fn select_mut(&mut self, level: GeoLevel) -> Option<&mut SelectField> {
        self.selects.get_mut(&level)
    }

    pub fn selects(&self) -> impl Iterator<Item = &SelectField> {
        self.selects.values()
    }

    pub fn text(&self, kind: TextKind) -> Option<&TextField> {
        self.texts.get(&kind)
    }

    pub(crate) fn text_mut(&mut self, kind: TextKind) -> Option<&mut TextField> {
        self.texts.get_mut(&kind)
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextField> {
        self.texts.values()
    }

    pub fn state(&self) -> FormState {
        if self.outstanding == 0 {
            FormState::Idle
        } else {
            FormState::Cascading
        }
    }

    pub(crate) fn begin_cascade(&mut self) {
        self.outstanding += 1;
    }

    pub(crate) fn end_cascade(&mut self) {
        self.outstanding = self.outstanding.saturating_sub(1);
    }
}

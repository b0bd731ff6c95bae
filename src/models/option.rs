//! Option identifiers and items
//!
//! `OptionItem` is what the lookup endpoints return; `FieldOption` is what a
//! select actually shows (fetched items plus the placeholder and, on
//! reconciliation, a synthetic orphan entry).

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::serde_helpers::deserialize_scalar_text;

/// Opaque identifier of a geographic entity.
///
/// Stored in textual form so `55` and `"55"` are the same id. The empty id
/// is reserved for the placeholder option.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(transparent)]
pub struct OptionId(String);

impl OptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The placeholder id
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// `None` for the placeholder id, so "nothing chosen" has one spelling
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Parse a raw select value; the empty value means nothing is chosen
    pub fn from_value(value: &str) -> Option<Self> {
        Self::new(value).non_empty()
    }
}

impl<'de> Deserialize<'de> for OptionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_scalar_text(deserializer).map(OptionId)
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OptionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for OptionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One entry of a lookup response (`{"id": .., "nombre": ..}` on the wire)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OptionItem {
    pub id: OptionId,
    #[serde(rename = "nombre", alias = "label")]
    pub label: String,
}

impl OptionItem {
    pub fn new(id: impl Into<OptionId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Where a displayed option came from
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// The leading "nothing chosen" entry
    Placeholder,
    /// Returned by the most recent lookup
    Fetched,
    /// Injected for a stored id that the lookup no longer returns
    Orphan,
}

/// An option as rendered in a select
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FieldOption {
    pub id: OptionId,
    pub label: String,
    pub kind: OptionKind,
}

impl FieldOption {
    pub fn placeholder(label: impl Into<String>) -> Self {
        Self {
            id: OptionId::empty(),
            label: label.into(),
            kind: OptionKind::Placeholder,
        }
    }

    pub fn fetched(item: OptionItem) -> Self {
        Self {
            id: item.id,
            label: item.label,
            kind: OptionKind::Fetched,
        }
    }

    /// Synthetic entry: the stored label followed by a visible marker
    pub fn orphan(id: OptionId, label: &str, marker: &str) -> Self {
        Self {
            id,
            label: format!("{} {}", label.trim(), marker),
            kind: OptionKind::Orphan,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == OptionKind::Placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_compare_by_value() {
        let from_number: OptionItem = serde_json::from_str(r#"{"id": 7, "nombre": "Centro"}"#).unwrap();
        let from_text: OptionItem = serde_json::from_str(r#"{"id": "7", "nombre": "Centro"}"#).unwrap();
        assert_eq!(from_number, from_text);
        assert_eq!(from_number.id, OptionId::from("7"));
    }

    #[test]
    fn test_label_alias() {
        let item: OptionItem = serde_json::from_str(r#"{"id": "MX", "label": "México"}"#).unwrap();
        assert_eq!(item.label, "México");
    }

    #[test]
    fn test_empty_value_is_nothing_chosen() {
        assert_eq!(OptionId::from_value(""), None);
        assert_eq!(OptionId::from_value("  "), None);
        assert_eq!(OptionId::from_value("JAL"), Some(OptionId::from("JAL")));
    }

    #[test]
    fn test_orphan_label_carries_marker() {
        let option = FieldOption::orphan("999".into(), "Colonia Vieja", "(not found in this municipality)");
        assert_eq!(option.label, "Colonia Vieja (not found in this municipality)");
        assert_eq!(option.kind, OptionKind::Orphan);
    }
}

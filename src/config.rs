//! Runtime configuration
//!
//! `GeoConfig` is passed from JavaScript as a plain object when the module
//! is initialized. Every key is optional; the defaults match the backend
//! routes and the markup of the existing pages.

use serde::{Deserialize, Serialize};

use crate::models::{GeoLevel, TextKind};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GeoConfig {
    /// Prefix for every endpoint path (empty: same origin)
    pub base_url: String,
    pub endpoints: Endpoints,
    pub placeholders: Placeholders,
    /// Appended to the stored label of a neighborhood that is no longer
    /// offered for its municipality
    pub orphan_marker: String,
    pub selectors: Selectors,
    pub boundary: BoundaryMarkers,
    /// Containers populated by `initSelects` when no id is given
    pub containers: Vec<String>,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            endpoints: Endpoints::default(),
            placeholders: Placeholders::default(),
            orphan_marker: "(not found in this municipality)".to_string(),
            selectors: Selectors::default(),
            boundary: BoundaryMarkers::default(),
            containers: vec![
                "datos-personales".to_string(),
                "datos-compania".to_string(),
                "datos-usuario".to_string(),
                "add-branch-form".to_string(),
            ],
        }
    }
}

impl GeoConfig {
    pub fn placeholder(&self, level: GeoLevel) -> &str {
        match level {
            GeoLevel::Country => &self.placeholders.country,
            GeoLevel::State => &self.placeholders.state,
            GeoLevel::Municipality => &self.placeholders.municipality,
            GeoLevel::Neighborhood => &self.placeholders.neighborhood,
        }
    }

    /// URL of the list lookup for `level`; `parent` must already be
    /// URL-safe. Returns `None` for a non-root level without a parent.
    pub fn level_url(&self, level: GeoLevel, parent: Option<&str>) -> Option<String> {
        let template = match level {
            GeoLevel::Country => return Some(format!("{}{}", self.base_url, self.endpoints.countries)),
            GeoLevel::State => &self.endpoints.states,
            GeoLevel::Municipality => &self.endpoints.municipalities,
            GeoLevel::Neighborhood => &self.endpoints.neighborhoods,
        };
        let parent = parent.filter(|p| !p.is_empty())?;
        Some(format!("{}{}", self.base_url, template.replace("{id}", parent)))
    }

    /// URL of the stored address lookup; `key` must already be URL-safe
    pub fn record_url(&self, key: &str) -> String {
        format!("{}{}", self.base_url, self.endpoints.address_record.replace("{key}", key))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Endpoints {
    pub countries: String,
    /// `{id}` is replaced by the country id
    pub states: String,
    /// `{id}` is replaced by the state id
    pub municipalities: String,
    /// `{id}` is replaced by the municipality id
    pub neighborhoods: String,
    /// `{key}` is replaced by the record key
    pub address_record: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            countries: "/get-paises".to_string(),
            states: "/get-estados/{id}".to_string(),
            municipalities: "/get-municipios/{id}".to_string(),
            neighborhoods: "/get-colonias/{id}".to_string(),
            address_record: "/get_dueño/{key}".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Placeholders {
    pub country: String,
    pub state: String,
    pub municipality: String,
    pub neighborhood: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            country: "Select the country".to_string(),
            state: "Select the state".to_string(),
            municipality: "Select the municipality".to_string(),
            neighborhood: "Select the neighborhood".to_string(),
        }
    }
}

/// How the selects of one level are found inside a form instance
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct LevelSelector {
    /// Values of the `name` attribute
    pub names: Vec<String>,
    /// Element ids of legacy markup that predates the `name` convention
    pub ids: Vec<String>,
}

impl LevelSelector {
    fn new(names: &[&str], ids: &[&str]) -> Self {
        Self {
            names: names.iter().map(|s| s.to_string()).collect(),
            ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// CSS selector matching any of the names or ids
    pub fn css(&self) -> String {
        self.names
            .iter()
            .map(|name| format!("select[name=\"{}\"]", name))
            .chain(self.ids.iter().map(|id| format!("select#{}", id)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Selectors {
    pub country: LevelSelector,
    pub state: LevelSelector,
    pub municipality: LevelSelector,
    pub neighborhood: LevelSelector,
    /// `name` attributes of the street input
    pub street: Vec<String>,
    /// `name` attributes of the house number input
    pub number: Vec<String>,
}

impl Selectors {
    pub fn for_level(&self, level: GeoLevel) -> &LevelSelector {
        match level {
            GeoLevel::Country => &self.country,
            GeoLevel::State => &self.state,
            GeoLevel::Municipality => &self.municipality,
            GeoLevel::Neighborhood => &self.neighborhood,
        }
    }

    pub fn for_text(&self, kind: TextKind) -> &[String] {
        match kind {
            TextKind::Street => &self.street,
            TextKind::Number => &self.number,
        }
    }
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            country: LevelSelector::new(&["paises"], &[]),
            state: LevelSelector::new(&["estados"], &[]),
            municipality: LevelSelector::new(
                &["municipios"],
                &["edit_municipio", "owner_municipios", "comp_municipios"],
            ),
            neighborhood: LevelSelector::new(
                &["idcolonia"],
                &["edit_colonia", "owner_idcolonia", "comp_idcolonia"],
            ),
            street: vec!["calle".to_string()],
            number: vec!["numero".to_string()],
        }
    }
}

/// What marks an element as a form instance boundary
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BoundaryMarkers {
    pub classes: Vec<String>,
    /// Tag names, compared case-insensitively
    pub tags: Vec<String>,
}

impl Default for BoundaryMarkers {
    fn default() -> Self {
        Self {
            classes: vec!["tab-pane".to_string()],
            tags: vec!["FORM".to_string()],
        }
    }
}

impl BoundaryMarkers {
    pub fn matches(&self, tag: &str, has_class: impl Fn(&str) -> bool) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) || self.classes.iter().any(|c| has_class(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = GeoConfig::default();
        assert_eq!(config.level_url(GeoLevel::Country, None).as_deref(), Some("/get-paises"));
        assert_eq!(config.level_url(GeoLevel::State, Some("MX")).as_deref(), Some("/get-estados/MX"));
        assert_eq!(config.level_url(GeoLevel::Neighborhood, Some("55")).as_deref(), Some("/get-colonias/55"));
        assert_eq!(config.level_url(GeoLevel::State, Some("")), None);
        assert_eq!(config.level_url(GeoLevel::Municipality, None), None);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: GeoConfig =
            serde_json::from_str(r#"{"baseUrl": "https://api.test", "placeholders": {"state": "Estado"}}"#).unwrap();
        assert_eq!(config.placeholder(GeoLevel::State), "Estado");
        assert_eq!(config.placeholder(GeoLevel::Country), "Select the country");
        assert_eq!(config.record_url("ABC123"), "https://api.test/get_dueño/ABC123");
        assert_eq!(config.containers.len(), 4);
    }

    #[test]
    fn test_level_selector_css() {
        let selectors = Selectors::default();
        assert_eq!(
            selectors.for_level(GeoLevel::Municipality).css(),
            "select[name=\"municipios\"], select#edit_municipio, select#owner_municipios, select#comp_municipios"
        );
    }

    #[test]
    fn test_boundary_markers() {
        let markers = BoundaryMarkers::default();
        assert!(markers.matches("form", |_| false));
        assert!(markers.matches("DIV", |c| c == "tab-pane"));
        assert!(!markers.matches("DIV", |_| false));
    }
}

//! Shared types for the WASM API
//!
//! Argument and result shapes exchanged with JavaScript.

use serde::{Deserialize, Serialize};

use crate::cascade::{CascadeOutcome, LoadOutcome, ReconcileOutcome, ReconcileTargets};

/// Options of `loadAddressFields`, named as the page scripts name them
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddressFieldOptions {
    /// Key of the stored record (the owner's RFC)
    pub rfc: String,
    pub pais_id: String,
    pub estado_id: String,
    pub municipio_id: String,
    pub colonia_id: String,
    #[serde(default)]
    pub calle_id: Option<String>,
    #[serde(default)]
    pub numero_id: Option<String>,
}

impl AddressFieldOptions {
    pub fn targets(&self) -> ReconcileTargets {
        ReconcileTargets {
            country: self.pais_id.clone(),
            state: self.estado_id.clone(),
            municipality: self.municipio_id.clone(),
            neighborhood: self.colonia_id.clone(),
            street: self.calle_id.clone(),
            number: self.numero_id.clone(),
        }
    }
}

/// Result of an operation, as reported back to JavaScript
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OperationReport {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperationReport {
    pub fn new(status: &'static str) -> Self {
        Self {
            status,
            scope: None,
            message: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl From<&LoadOutcome> for OperationReport {
    fn from(outcome: &LoadOutcome) -> Self {
        match outcome {
            LoadOutcome::Applied { selected: true } => OperationReport::new("selected"),
            LoadOutcome::Applied { selected: false } => OperationReport::new("loaded"),
            LoadOutcome::Empty => OperationReport::new("empty"),
            LoadOutcome::Skipped => OperationReport::new("skipped"),
            LoadOutcome::Superseded => OperationReport::new("superseded"),
            LoadOutcome::Failed(error) => OperationReport::new("failed").with_message(error.to_string()),
            LoadOutcome::MissingTarget => OperationReport::new("missing"),
        }
    }
}

impl From<&CascadeOutcome> for OperationReport {
    fn from(outcome: &CascadeOutcome) -> Self {
        match outcome {
            CascadeOutcome::Loaded(load) => OperationReport::from(load),
            CascadeOutcome::Reset => OperationReport::new("reset"),
            CascadeOutcome::Leaf => OperationReport::new("leaf"),
            CascadeOutcome::Aborted(error) => OperationReport::new("aborted").with_message(error.to_string()),
        }
    }
}

impl From<&ReconcileOutcome> for OperationReport {
    fn from(outcome: &ReconcileOutcome) -> Self {
        match outcome {
            ReconcileOutcome::Complete { neighborhood, unlisted } if unlisted.is_empty() => {
                OperationReport::new("complete").with_message(format!("neighborhood: {:?}", neighborhood))
            }
            ReconcileOutcome::Complete { neighborhood, unlisted } => OperationReport::new("partial").with_message(
                format!("neighborhood: {:?}, not offered: {:?}", neighborhood, unlisted),
            ),
            ReconcileOutcome::Aborted { step, error } => {
                OperationReport::new("aborted").with_message(format!("{:?}: {}", step, error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SyncError;

    #[test]
    fn test_options_from_page_script_names() {
        let json = r#"{"rfc": "ABC", "paisId": "owner_paises", "estadoId": "owner_estados",
                       "municipioId": "owner_municipios", "coloniaId": "owner_idcolonia",
                       "calleId": "owner_calle", "numeroId": "owner_numero"}"#;
        let options: AddressFieldOptions = serde_json::from_str(json).unwrap();
        let targets = options.targets();
        assert_eq!(targets.municipality, "owner_municipios");
        assert_eq!(targets.number.as_deref(), Some("owner_numero"));
    }

    #[test]
    fn test_unlisted_levels_report_partial() {
        use crate::cascade::NeighborhoodResolution;
        use crate::models::GeoLevel;

        let outcome = ReconcileOutcome::Complete {
            neighborhood: NeighborhoodResolution::Matched,
            unlisted: vec![GeoLevel::State],
        };
        assert_eq!(OperationReport::from(&outcome).status, "partial");

        let outcome = ReconcileOutcome::Complete {
            neighborhood: NeighborhoodResolution::Orphan,
            unlisted: vec![],
        };
        assert_eq!(OperationReport::from(&outcome).status, "complete");
    }

    #[test]
    fn test_report_serialization() {
        let report = OperationReport::from(&CascadeOutcome::Aborted(SyncError::MissingScope));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "aborted");
        assert!(json.get("scope").is_none());
    }
}

//! Stored address records
//!
//! The flat address row returned by the single-record lookup. Read-only
//! input to reconciliation; every field may be null or absent.

use serde::{Deserialize, Serialize};

use super::option::OptionId;
use super::serde_helpers::deserialize_optional_text;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressRecord {
    #[serde(rename = "idpais", default, deserialize_with = "deserialize_optional_id")]
    pub country_id: Option<OptionId>,

    #[serde(rename = "idestado", default, deserialize_with = "deserialize_optional_id")]
    pub state_id: Option<OptionId>,

    #[serde(rename = "idmunicipio", default, deserialize_with = "deserialize_optional_id")]
    pub municipality_id: Option<OptionId>,

    #[serde(rename = "idcolonia", default, deserialize_with = "deserialize_optional_id")]
    pub neighborhood_id: Option<OptionId>,

    /// Display text of the stored neighborhood, used when its id is no
    /// longer offered for the stored municipality
    #[serde(rename = "colonia", default, deserialize_with = "deserialize_optional_text")]
    pub neighborhood_label: Option<String>,

    #[serde(rename = "calle", default, deserialize_with = "deserialize_optional_text")]
    pub street: Option<String>,

    #[serde(rename = "numero", default, deserialize_with = "deserialize_optional_text")]
    pub number: Option<String>,
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<OptionId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_optional_text(deserializer).map(|text| text.map(OptionId::new))
}

impl AddressRecord {
    /// The stored neighborhood as an orphan candidate: both id and label
    /// must be present
    pub fn orphan_neighborhood(&self) -> Option<(&OptionId, &str)> {
        match (&self.neighborhood_id, &self.neighborhood_label) {
            (Some(id), Some(label)) => Some((id, label.as_str())),
            _ => None,
        }
    }
}

//! Serde helpers for the loosely-typed payloads returned by the lookup endpoints
//!
//! The backend sends identifiers and house numbers either as JSON strings or
//! as JSON numbers depending on the column type. Both are normalized to
//! their textual form so values compare by value, not by JSON type.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::UInt(n) => n.to_string(),
            // 55.0 and 55 must compare equal
            Scalar::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (f as i64).to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// Deserialize a string-or-number into its textual form
pub fn deserialize_scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Scalar::into_text)
}

/// Deserialize an optional string-or-number; `null`, a missing field and
/// blank text all become `None`
pub fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value
        .map(Scalar::into_text)
        .filter(|text| !text.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "deserialize_scalar_text")]
        id: String,
        #[serde(default, deserialize_with = "deserialize_optional_text")]
        extra: Option<String>,
    }

    #[test]
    fn test_numbers_and_strings_normalize() {
        let a: Sample = serde_json::from_str(r#"{"id": 55}"#).unwrap();
        let b: Sample = serde_json::from_str(r#"{"id": "55"}"#).unwrap();
        let c: Sample = serde_json::from_str(r#"{"id": 55.0}"#).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(b.id, c.id);
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        let p: Sample = serde_json::from_str(r#"{"id": "1", "extra": "  "}"#).unwrap();
        assert_eq!(p.extra, None);
        let p: Sample = serde_json::from_str(r#"{"id": "1", "extra": null}"#).unwrap();
        assert_eq!(p.extra, None);
        let p: Sample = serde_json::from_str(r#"{"id": "1"}"#).unwrap();
        assert_eq!(p.extra, None);
        let p: Sample = serde_json::from_str(r#"{"id": "1", "extra": 12}"#).unwrap();
        assert_eq!(p.extra.as_deref(), Some("12"));
    }
}

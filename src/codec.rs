//! URL codec for filter sets
//!
//! Encodes a filter set into a percent-encoded JSON array suitable for a
//! `filters` query parameter, and restores one from such a parameter. The
//! persisted form is the raw editing state (original values and units, before
//! any normalization) so a restored session shows exactly what was saved.
//!
//! Decoding is total: a malformed or hand-edited parameter yields the default
//! single-row set instead of an error.

use crate::model::{FilterRow, FilterSet};
use thiserror::Error;

/// Why a `filters` parameter failed to parse. [`decode`] swallows these and
/// falls back; [`try_decode`] exposes them for diagnostics.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid percent-encoding: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Invalid filter payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize a filter set for the `filters` query parameter.
///
/// Rows that would not survive normalization (unset key or no values) are not
/// persisted either. Returns the empty string when nothing survives, meaning
/// the parameter should be omitted entirely.
pub fn encode(set: &FilterSet) -> String {
    let valid: Vec<&FilterRow> = set.rows().iter().filter(|row| row.is_complete()).collect();
    if valid.is_empty() {
        return String::new();
    }
    // serde_json only fails on non-string map keys; the model has none.
    let json = serde_json::to_string(&valid).unwrap_or_default();
    urlencoding::encode(&json).into_owned()
}

/// Parse a `filters` parameter value, reporting what went wrong.
///
/// A payload that parses but is not a JSON array is an error too.
pub fn try_decode(text: &str) -> Result<FilterSet, DecodeError> {
    let decoded = urlencoding::decode(text)?;
    let rows: Vec<FilterRow> = serde_json::from_str(&decoded)?;
    Ok(FilterSet::from_rows(rows))
}

/// Parse a `filters` parameter value, falling back to the default single-row
/// set on any failure. Restoring a corrupt URL must never fail the widget.
pub fn decode(text: &str) -> FilterSet {
    try_decode(text).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Operator;

    #[test]
    fn test_encode_skips_incomplete_rows() {
        let mut set = FilterSet::default();
        set.add_row();
        set.set_key(0, "Status");
        set.set_values(0, vec!["Online".into()]);
        set.set_key(1, "Size"); // never given a value

        let encoded = encode(&set);
        let restored = decode(&encoded);
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.row(0).unwrap().key, "Status");
    }

    #[test]
    fn test_encode_empty_set_is_empty_string() {
        assert_eq!(encode(&FilterSet::default()), "");
        assert_eq!(encode(&FilterSet::from_rows(vec![])), "");
    }

    #[test]
    fn test_payload_is_percent_encoded_json() {
        let mut set = FilterSet::default();
        set.set_key(0, "Parent ID");
        set.set_values(0, vec!["P-0".into()]);

        let encoded = encode(&set);
        // URL-safe: no raw JSON delimiters survive the encoding.
        assert!(!encoded.contains('{'));
        assert!(!encoded.contains('"'));
        assert!(!encoded.contains(' '));

        let json = urlencoding::decode(&encoded).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["key"], "Parent ID");
        assert_eq!(parsed[0]["operator"], "in");
    }

    #[test]
    fn test_decode_fallback_on_garbage() {
        for input in ["", "not json", "%7B%7D", "{}", "%ZZ", "42", "\"text\""] {
            assert_eq!(decode(input), FilterSet::default(), "input: {input:?}");
        }
    }

    #[test]
    fn test_try_decode_reports_non_array_payload() {
        assert!(matches!(try_decode("%7B%7D"), Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_decode_preserves_unknown_fields_verbatim() {
        // A stale key from an older catalog survives decode; downstream
        // treats it as unsupported.
        let json = r#"[{"key":"Throughput","operator":"ge","values":[3]}]"#;
        let set = decode(&urlencoding::encode(json));
        assert_eq!(set.row(0).unwrap().key, "Throughput");
        assert_eq!(set.row(0).unwrap().operator, Operator::GreaterOrEqual);
    }

    #[test]
    fn test_decode_defaults_missing_operator() {
        let json = r#"[{"key":"Status","values":["Online"]}]"#;
        let set = decode(&urlencoding::encode(json));
        assert_eq!(set.row(0).unwrap().operator, Operator::Equals);
    }
}

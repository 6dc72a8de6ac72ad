//! Raw vendor payload → [`UnitRecord`] normalization.
//!
//! One submodule per vendor surface plus shared helpers. The pipeline is
//! deliberately tolerant: a missing key anywhere in a lookup path yields
//! an absent field, never an error, and a payload missing its identity
//! fields is skipped rather than failing the poll.

mod label;
mod mobility;
mod scrape;
mod tracking;

pub use label::{canonicalize_label, color_state};
pub use mobility::normalize_mobility;
pub use scrape::scrape_indicators;
pub use tracking::normalize_tracking;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Walk a nested JSON object along `path`. Any missing intermediate key
/// (or non-object intermediate value) yields `None`.
pub fn value_at_path<'a>(data: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = data;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

/// String at a nested path, trimmed; empty strings count as absent.
pub(crate) fn str_at(data: &Value, path: &[&str]) -> Option<String> {
    let s = value_at_path(data, path)?.as_str()?.trim();
    if s.is_empty() { None } else { Some(s.to_owned()) }
}

/// Number at a nested path. Accepts JSON numbers and numeric strings --
/// both vendors mix the two freely.
pub(crate) fn f64_at(data: &Value, path: &[&str]) -> Option<f64> {
    match value_at_path(data, path)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse an ISO-8601 timestamp, assuming UTC when no offset is present.
pub(crate) fn parse_api_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_at_path_walks_nested_objects() {
        let data = json!({ "Position": { "Speed": 42 } });
        assert_eq!(
            value_at_path(&data, &["Position", "Speed"]),
            Some(&json!(42))
        );
    }

    #[test]
    fn missing_intermediate_key_is_absent_not_an_error() {
        let data = json!({ "Name": "Van 1" });
        assert_eq!(value_at_path(&data, &["Position", "Speed"]), None);
        assert_eq!(f64_at(&data, &["Position", "Speed"]), None);
        assert_eq!(str_at(&data, &["Position", "Address"]), None);
    }

    #[test]
    fn non_object_intermediate_is_absent() {
        let data = json!({ "Position": 5 });
        assert_eq!(value_at_path(&data, &["Position", "Speed"]), None);
    }

    #[test]
    fn f64_accepts_numeric_strings() {
        let data = json!({ "Speed": "54.5" });
        assert_eq!(f64_at(&data, &["Speed"]), Some(54.5));
    }

    #[test]
    fn iso_datetime_with_and_without_offset() {
        assert_eq!(
            parse_api_datetime("2026-06-15T10:00:00Z")
                .expect("parses")
                .to_rfc3339(),
            "2026-06-15T10:00:00+00:00"
        );
        // Naive timestamps are taken as UTC.
        assert_eq!(
            parse_api_datetime("2026-06-15T10:00:00")
                .expect("parses")
                .to_rfc3339(),
            "2026-06-15T10:00:00+00:00"
        );
        assert!(parse_api_datetime("yesterday").is_none());
    }
}

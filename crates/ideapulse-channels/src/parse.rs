//! Defensive field extraction for upstream JSON envelopes.
//!
//! The aggregation API nests its payload differently across versions:
//! `data.data.items`, `data.items`, or a bare `items` have all been
//! observed. Every accessor here falls back to an empty/zero value instead
//! of failing, so an unexpected shape degrades to an empty crawl rather
//! than an error.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Unwraps the response envelope: prefers `data.data`, then `data`, then
/// the body itself.
pub(crate) fn envelope(body: &Value) -> &Value {
    if let Some(inner) = body.get("data") {
        if let Some(nested) = inner.get("data") {
            if nested.is_object() {
                return nested;
            }
        }
        if inner.is_object() {
            return inner;
        }
    }
    body
}

/// Returns the array under `key`, or an empty slice when absent or not an
/// array.
pub(crate) fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice)
}

/// Returns the first non-empty string among `keys`. Numeric values are
/// stringified (upstream ids are sometimes numbers).
pub(crate) fn str_field(value: &Value, keys: &[&str]) -> String {
    for key in keys {
        match value.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return s.trim().to_owned(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    String::new()
}

/// Returns the first numeric value among `keys` as `u64`, defaulting to 0.
/// Accepts numbers, floats (truncated at zero), and numeric strings.
pub(crate) fn u64_field(value: &Value, keys: &[&str]) -> u64 {
    for key in keys {
        match value.get(key) {
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_u64() {
                    return v;
                }
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                if let Some(f) = n.as_f64() {
                    return f.max(0.0) as u64;
                }
            }
            Some(Value::String(s)) => {
                if let Ok(v) = s.trim().parse::<u64>() {
                    return v;
                }
            }
            _ => {}
        }
    }
    0
}

/// Interprets `key` as a truthiness flag: boolean, or a non-zero number.
pub(crate) fn bool_field(value: &Value, key: &str) -> bool {
    match value.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|v| v != 0),
        _ => false,
    }
}

/// Best-effort timestamp extraction: unix seconds (number or numeric
/// string, milliseconds auto-detected) or an RFC 3339 string.
pub(crate) fn timestamp_field(value: &Value, keys: &[&str]) -> Option<DateTime<Utc>> {
    for key in keys {
        match value.get(key) {
            Some(Value::Number(n)) => {
                if let Some(dt) = n.as_i64().and_then(from_unix) {
                    return Some(dt);
                }
            }
            Some(Value::String(s)) if !s.is_empty() => {
                if let Ok(secs) = s.trim().parse::<i64>() {
                    if let Some(dt) = from_unix(secs) {
                        return Some(dt);
                    }
                }
                if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                    return Some(dt.with_timezone(&Utc));
                }
            }
            _ => {}
        }
    }
    None
}

/// Millisecond timestamps are 13 digits; anything above this threshold is
/// treated as milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

fn from_unix(raw: i64) -> Option<DateTime<Utc>> {
    if raw <= 0 {
        return None;
    }
    if raw > MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(raw)
    } else {
        DateTime::from_timestamp(raw, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_prefers_doubly_nested_data() {
        let body = json!({"data": {"data": {"items": [1]}}});
        assert_eq!(envelope(&body)["items"], json!([1]));
    }

    #[test]
    fn envelope_falls_back_to_single_data() {
        let body = json!({"data": {"items": [2]}});
        assert_eq!(envelope(&body)["items"], json!([2]));
    }

    #[test]
    fn envelope_falls_back_to_body() {
        let body = json!({"items": [3]});
        assert_eq!(envelope(&body)["items"], json!([3]));
    }

    #[test]
    fn array_field_defaults_to_empty() {
        assert!(array_field(&json!({}), "items").is_empty());
        assert!(array_field(&json!({"items": "nope"}), "items").is_empty());
    }

    #[test]
    fn str_field_takes_first_non_empty_and_stringifies_numbers() {
        let v = json!({"a": "", "b": 42, "c": "x"});
        assert_eq!(str_field(&v, &["a", "b", "c"]), "42");
        assert_eq!(str_field(&v, &["a", "c"]), "x");
        assert_eq!(str_field(&v, &["missing"]), "");
    }

    #[test]
    fn u64_field_handles_numbers_strings_and_garbage() {
        let v = json!({"n": 7, "s": "12", "f": 3.9, "bad": "lots"});
        assert_eq!(u64_field(&v, &["n"]), 7);
        assert_eq!(u64_field(&v, &["s"]), 12);
        assert_eq!(u64_field(&v, &["f"]), 3);
        assert_eq!(u64_field(&v, &["bad"]), 0);
        assert_eq!(u64_field(&v, &["missing"]), 0);
    }

    #[test]
    fn bool_field_accepts_numeric_flags() {
        let v = json!({"t": true, "one": 1, "zero": 0});
        assert!(bool_field(&v, "t"));
        assert!(bool_field(&v, "one"));
        assert!(!bool_field(&v, "zero"));
        assert!(!bool_field(&v, "missing"));
    }

    #[test]
    fn timestamp_field_reads_unix_seconds_and_millis() {
        let v = json!({"secs": 1_700_000_000, "millis": 1_700_000_000_000_i64});
        let secs = timestamp_field(&v, &["secs"]).unwrap();
        let millis = timestamp_field(&v, &["millis"]).unwrap();
        assert_eq!(secs, millis);
    }

    #[test]
    fn timestamp_field_reads_rfc3339_strings() {
        let v = json!({"t": "2024-05-01T10:00:00+08:00"});
        let dt = timestamp_field(&v, &["t"]).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T02:00:00+00:00");
    }

    #[test]
    fn timestamp_field_defaults_to_none() {
        let v = json!({"t": "not a date", "z": 0});
        assert!(timestamp_field(&v, &["t", "z", "missing"]).is_none());
    }
}

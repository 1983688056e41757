//! Environment variable helpers.
//!
//! Discord ids are plain integers, while friend lookups are JSON-encoded maps
//! and lists. JSON helpers never fail: a missing key or malformed value is
//! logged and yields `None`.

use crate::errors::{Error, Result};
use serde_json::{Map, Value};
use tracing::{error, warn};

/// Reads a required Discord id from the environment.
pub fn get_id(key: &str) -> Result<u64> {
    let raw = std::env::var(key).map_err(|e| Error::config(format!("{key}: {e}")))?;
    raw.trim()
        .parse::<u64>()
        .map_err(|e| Error::config(format!("{key} is not a valid id ({raw}): {e}")))
}

/// Reads an optional Discord id. Unset or blank is `None`; an unparsable
/// value is logged and ignored.
#[must_use]
pub fn get_optional_id(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok().filter(|raw| !raw.trim().is_empty())?;
    match raw.trim().parse::<u64>() {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Ignoring {key}: '{raw}' is not a valid id ({e})");
            None
        }
    }
}

/// Gets a JSON object from the environment variable `key`.
///
/// Returns `None` if the key is absent or empty, the value is not valid JSON,
/// or the JSON is not an object.
#[must_use]
pub fn get_dict(key: &str) -> Option<Map<String, Value>> {
    let raw = std::env::var(key).ok()?;
    parse_dict(&raw)
}

/// Gets a JSON list of strings from the environment variable `key`.
#[must_use]
pub fn get_list(key: &str) -> Option<Vec<String>> {
    let raw = std::env::var(key).ok()?;
    parse_list(&raw)
}

pub(crate) fn parse_dict(raw: &str) -> Option<Map<String, Value>> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            error!("Expected a JSON object");
            None
        }
        Err(e) => {
            error!("Could not decode JSON: {e}");
            None
        }
    }
}

pub(crate) fn parse_list(raw: &str) -> Option<Vec<String>> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(list) => Some(list),
        Err(e) => {
            error!("Could not decode JSON list of strings: {e}");
            None
        }
    }
}

/// Interprets a JSON value as a Discord id. Ids may be encoded as numbers or
/// as strings (large snowflakes are usually quoted).
#[must_use]
pub fn id_from_json(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_dict_object() {
        let map = parse_dict(r#"{"KAELEY": "123456789012345678", "DECLAN": 42}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(id_from_json(&map["KAELEY"]), Some(123_456_789_012_345_678));
        assert_eq!(id_from_json(&map["DECLAN"]), Some(42));
    }

    #[test]
    fn test_parse_dict_rejects_non_objects() {
        assert!(parse_dict("[1, 2, 3]").is_none());
        assert!(parse_dict("not json").is_none());
        assert!(parse_dict("   ").is_none());
    }

    #[test]
    fn test_parse_list() {
        let names = parse_list(r#"["Scuzz", "Kaeley"]"#).unwrap();
        assert_eq!(names, vec!["Scuzz".to_string(), "Kaeley".to_string()]);
        assert!(parse_list(r#"{"a": 1}"#).is_none());
        assert!(parse_list("[1, 2]").is_none());
    }

    #[test]
    fn test_id_from_json_rejects_other_shapes() {
        assert_eq!(id_from_json(&json!(true)), None);
        assert_eq!(id_from_json(&json!("abc")), None);
        assert_eq!(id_from_json(&json!(-5)), None);
    }

    #[test]
    fn test_missing_variables() {
        assert!(get_dict("PETRICHOR_TEST_SURELY_UNSET_DICT").is_none());
        assert!(get_list("PETRICHOR_TEST_SURELY_UNSET_LIST").is_none());
        assert!(get_optional_id("PETRICHOR_TEST_SURELY_UNSET_ID").is_none());
        assert!(matches!(
            get_id("PETRICHOR_TEST_SURELY_UNSET_ID"),
            Err(Error::Config { .. })
        ));
    }
}

//! Cookie payload codec.
//!
//! # Responsibilities
//! - Serialize an override set to compact JSON
//! - Percent-escape the JSON so it survives as a single cookie value
//! - Reverse both steps, rejecting anything that is not a JSON object
//!
//! # Design Decisions
//! - Only RFC 3986 unreserved bytes pass through unescaped; `/`, `:` and the
//!   other reserved delimiters are always escaped since the same values end up
//!   inside Location-bearing responses
//! - `+` is literal on decode, never a space

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

use crate::overrides::error::OverrideError;
use crate::overrides::OverrideSet;

/// Everything except `A-Z a-z 0-9 - . _ ~`.
const COOKIE_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Encode an override set into a cookie-safe string.
pub fn encode(overrides: &OverrideSet) -> String {
    let json = Value::Object(overrides.clone()).to_string();
    utf8_percent_encode(&json, COOKIE_VALUE).to_string()
}

/// Decode a cookie value back into an override set.
///
/// An empty input yields an empty set.
pub fn decode(raw: &str) -> Result<OverrideSet, OverrideError> {
    if raw.is_empty() {
        return Ok(OverrideSet::new());
    }

    let unescaped = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|e| OverrideError::MalformedPayload(format!("invalid UTF-8 after unescaping: {}", e)))?;

    match serde_json::from_str::<Value>(&unescaped) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(OverrideError::MalformedPayload(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(OverrideError::MalformedPayload(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set(value: Value) -> OverrideSet {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_encode_escapes_reserved_delimiters() {
        let encoded = encode(&set(json!({"URL": "http://example.com/a b;c=d,e"})));

        for forbidden in ['/', ':', ' ', ';', '=', ',', '"', '{', '}'] {
            assert!(!encoded.contains(forbidden), "{} leaked into {}", forbidden, encoded);
        }
        assert!(encoded.contains("%2F"));
        assert!(encoded.contains("%3A"));
    }

    #[test]
    fn test_encode_matches_compact_json() {
        let encoded = encode(&set(json!({"API_DOMAIN": "bar"})));
        assert_eq!(encoded, "%7B%22API_DOMAIN%22%3A%22bar%22%7D");
    }

    #[test]
    fn test_decode_empty_is_empty_set() {
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_accepts_unescaped_json() {
        let decoded = decode(r#"{"DEBUG":true}"#).unwrap();
        assert_eq!(decoded.get("DEBUG"), Some(&json!(true)));
    }

    #[test]
    fn test_decode_keeps_plus_literal() {
        let decoded = decode("%7B%22A%22%3A%22x+y%22%7D").unwrap();
        assert_eq!(decoded.get("A"), Some(&json!("x+y")));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("not-json"), Err(OverrideError::MalformedPayload(_))));
        assert!(matches!(decode("%7B%22A%22"), Err(OverrideError::MalformedPayload(_))));
    }

    #[test]
    fn test_decode_rejects_non_object_top_level() {
        for raw in ["%5B1%2C2%5D", "42", "%22text%22", "null", "true"] {
            let err = decode(raw).unwrap_err();
            assert!(matches!(err, OverrideError::MalformedPayload(_)), "{} accepted", raw);
        }
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert!(matches!(decode("%FF%FE"), Err(OverrideError::MalformedPayload(_))));
    }

    #[test]
    fn test_nested_values_survive() {
        let original = set(json!({
            "FEATURES": {"beta": [1, 2, {"x": null}]},
            "RATIO": 0.5,
            "NAME": "caf\u{e9} & co",
        }));
        assert_eq!(decode(&encode(&original)).unwrap(), original);
    }
}

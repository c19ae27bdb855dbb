//! Deep partial matching of errors against JSON patterns.
//!
//! A pattern matches a value when every field the pattern names is present
//! in the value and matches recursively. Fields the pattern does not name
//! are ignored, so `{"code": "X"}` matches `{"code": "X", "detail": ...}`.

use serde::Serialize;
use serde_json::{Number, Value};
use tracing::trace;

/// Check whether `value` matches `pattern`.
///
/// - Objects: every key of the pattern must exist in the value and match.
///   An empty object pattern matches anything.
/// - Arrays: every element of the pattern must match some element of the value.
/// - Numbers: compared numerically, so `1` matches `1.0`.
/// - Everything else: plain equality.
pub fn is_match(value: &Value, pattern: &Value) -> bool {
    match (value, pattern) {
        (_, Value::Object(expected)) if expected.is_empty() => true,
        (Value::Object(actual), Value::Object(expected)) => expected
            .iter()
            .all(|(key, sub)| actual.get(key).is_some_and(|v| is_match(v, sub))),
        (Value::Array(actual), Value::Array(expected)) => expected
            .iter()
            .all(|sub| actual.iter().any(|v| is_match(v, sub))),
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        _ => value == pattern,
    }
}

/// Serialize `error` and match it against `pattern`.
///
/// Errors that cannot be serialized never match.
pub fn matches_shape<E: Serialize>(error: &E, pattern: &Value) -> bool {
    match serde_json::to_value(error) {
        Ok(value) => is_match(&value, pattern),
        Err(err) => {
            trace!(error = %err, "Error value could not be serialized for matching");
            false
        }
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct DbError {
        code: &'static str,
        retryable: bool,
        attempts: u32,
    }

    #[test]
    fn test_partial_object_match() {
        let value = json!({"code": "DB_INSUFFICIENT_SCALE", "detail": "scaling"});
        assert!(is_match(&value, &json!({"code": "DB_INSUFFICIENT_SCALE"})));
        assert!(!is_match(&value, &json!({"code": "OTHER"})));
        assert!(!is_match(&value, &json!({"missing": null})));
    }

    #[test]
    fn test_nested_match() {
        let value = json!({"cause": {"status": 503, "headers": {"retry-after": "5"}}});
        assert!(is_match(&value, &json!({"cause": {"status": 503}})));
        assert!(!is_match(&value, &json!({"cause": {"status": 500}})));
    }

    #[test]
    fn test_array_subset_match() {
        let value = json!({"tags": ["transient", "db", "eu-west"]});
        assert!(is_match(&value, &json!({"tags": ["db", "transient"]})));
        assert!(!is_match(&value, &json!({"tags": ["fatal"]})));
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert!(is_match(&json!({"code": 123}), &json!({"code": 123.0})));
        assert!(!is_match(&json!({"code": 123}), &json!({"code": "123"})));
    }

    #[test]
    fn test_empty_pattern_matches_anything() {
        assert!(is_match(&json!("text"), &json!({})));
        assert!(is_match(&Value::Null, &json!({})));
    }

    #[test]
    fn test_scalar_against_object_pattern() {
        assert!(!is_match(
            &json!("DB_INSUFFICIENT_SCALE"),
            &json!({"code": "DB_INSUFFICIENT_SCALE"})
        ));
    }

    #[test]
    fn test_matches_shape_serializes_error() {
        let error = DbError {
            code: "DB_INSUFFICIENT_SCALE",
            retryable: true,
            attempts: 2,
        };
        assert!(matches_shape(
            &error,
            &json!({"code": "DB_INSUFFICIENT_SCALE", "retryable": true})
        ));
        assert!(!matches_shape(&error, &json!({"attempts": 3})));
    }
}

//! Dynamic value model shared by attributes, conditions, feature definitions and results.
use std::collections::HashMap;

use derive_more::From;
use serde::{Deserialize, Serialize};

/// A JSON-like value.
///
/// Attributes, targeting conditions, forced values and variations are all expressed as `Value`.
/// An attribute that is not present at all is represented as `Option<&Value>::None` ("absent"),
/// which is distinct from [`Value::Null`] only for the few operators that care.
///
/// Conveniently implements `From` conversions for `bool`, `f64`, `String`, `&str`, arrays, objects
/// and [`serde_json::Value`].
///
/// ```
/// # use growthbook_core::Value;
/// let string_value: Value = "example".into();
/// let number_value: Value = 42.0.into();
/// let json_value: Value = serde_json::json!({"country": "US"}).into();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, From)]
#[serde(untagged)]
pub enum Value {
    /// A null value.
    #[default]
    Null,
    /// A boolean value.
    Bool(bool),
    /// A numerical value. All numbers are treated as double precision floats.
    Number(f64),
    /// A string value.
    String(String),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// A mapping from string keys to values. Key order is irrelevant.
    Object(HashMap<String, Value>),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Value {
    /// Truthiness used to derive `on`/`off` of a feature.
    ///
    /// `null`, `false`, `0`, `NaN` and the empty string are falsy. Everything else is truthy,
    /// including empty arrays and empty objects.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    #[allow(missing_docs)]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[allow(missing_docs)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[allow(missing_docs)]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[allow(missing_docs)]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    #[allow(missing_docs)]
    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Convert a scalar to the string representation used for hashing.
    ///
    /// Returns `None` for null, arrays and objects, which cannot serve as a hash attribute.
    pub(crate) fn to_hash_string(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(format_number(*n)),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Name of the value type as reported by the `$type` operator.
///
/// Absent values report `"null"`.
pub fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None | Some(Value::Null) => "null",
        Some(Value::String(_)) => "string",
        Some(Value::Number(_)) => "number",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// Structural equality.
///
/// Absent and `null` are equal to each other and to nothing else. Arrays compare element-wise in
/// order, objects compare by key set and per-key value regardless of key order.
pub fn deep_eq(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => true,
        (None | Some(Value::Null), _) | (_, None | Some(Value::Null)) => false,
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a == b,
        (Some(Value::Number(a)), Some(Value::Number(b))) => a == b,
        (Some(Value::String(a)), Some(Value::String(b))) => a == b,
        (Some(Value::Array(a)), Some(Value::Array(b))) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| deep_eq(Some(a), Some(b)))
        }
        (Some(Value::Object(a)), Some(Value::Object(b))) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).is_some_and(|b| deep_eq(Some(a), Some(b))))
        }
        _ => false,
    }
}

/// Format a number the way JavaScript's `String(n)` does: integral numbers have no fractional
/// part (`1`, not `1.0`), and magnitudes below `1e-6` or from `1e21` up use exponent notation with
/// an explicit sign (`1e+21`, `1.5e-7`).
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_owned()
    } else if n == 0.0 {
        // Also covers -0.
        "0".to_owned()
    } else if (1e-6..1e21).contains(&n.abs()) {
        n.to_string()
    } else {
        // `{:e}` yields the shortest round-trip mantissa, e.g. `1.5e-7` or `1e21`.
        let formatted = format!("{n:e}");
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{deep_eq, format_number, type_name, Value};

    fn v(json: serde_json::Value) -> Value {
        json.into()
    }

    #[test]
    fn absent_equals_null() {
        assert!(deep_eq(None, Some(&Value::Null)));
        assert!(deep_eq(Some(&Value::Null), None));
        assert!(deep_eq(None, None));
        assert!(!deep_eq(Some(&Value::Null), Some(&0.0.into())));
        assert!(!deep_eq(None, Some(&"".into())));
        assert!(!deep_eq(Some(&false.into()), None));
    }

    #[test]
    fn arrays_are_order_sensitive() {
        assert!(deep_eq(Some(&v(json!([1, 2]))), Some(&v(json!([1, 2])))));
        assert!(!deep_eq(Some(&v(json!([1, 2]))), Some(&v(json!([2, 1])))));
        assert!(!deep_eq(Some(&v(json!([1, 2]))), Some(&v(json!([1, 2, 3])))));
    }

    #[test]
    fn objects_ignore_key_order() {
        assert!(deep_eq(
            Some(&v(json!({"a": 1, "b": {"c": [true]}}))),
            Some(&v(json!({"b": {"c": [true]}, "a": 1})))
        ));
        assert!(!deep_eq(
            Some(&v(json!({"a": null}))),
            Some(&v(json!({"b": 1})))
        ));
        assert!(!deep_eq(Some(&v(json!({}))), Some(&v(json!([])))));
    }

    #[test]
    fn deep_eq_is_symmetric() {
        let values = [
            v(json!(null)),
            v(json!(0)),
            v(json!("0")),
            v(json!(false)),
            v(json!([])),
            v(json!({})),
            v(json!({"x": [1, {"y": null}]})),
        ];
        for a in &values {
            assert!(deep_eq(Some(a), Some(a)));
            for b in &values {
                assert_eq!(deep_eq(Some(a), Some(b)), deep_eq(Some(b), Some(a)));
            }
        }
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(!Value::from(0.0).is_truthy());
        assert!(!Value::from(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());

        assert!(Value::from(true).is_truthy());
        assert!(Value::from(-1.0).is_truthy());
        assert!(Value::from("false").is_truthy());
        assert!(v(json!([])).is_truthy());
        assert!(v(json!({})).is_truthy());
    }

    #[test]
    fn type_names() {
        assert_eq!(type_name(None), "null");
        assert_eq!(type_name(Some(&Value::Null)), "null");
        assert_eq!(type_name(Some(&"a".into())), "string");
        assert_eq!(type_name(Some(&1.0.into())), "number");
        assert_eq!(type_name(Some(&true.into())), "boolean");
        assert_eq!(type_name(Some(&v(json!([1])))), "array");
        assert_eq!(type_name(Some(&v(json!({"a": 1})))), "object");
    }

    #[test]
    fn numbers_format_without_trailing_zero() {
        assert_eq!(format_number(123.0), "123");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(0.1), "0.1");
    }

    #[test]
    fn format_number_exponent_notation() {
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.23e22), "1.23e+22");
        assert_eq!(format_number(-2e25), "-2e+25");
        assert_eq!(format_number(1e-6), "0.000001");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(9.99e-7), "9.99e-7");
        assert_eq!(format_number(-1.5e-7), "-1.5e-7");
        assert_eq!(format_number(12345678901234567890123.0), "1.2345678901234568e+22");
        assert_eq!(
            Value::Number(1e21).to_hash_string().as_deref(),
            Some("1e+21")
        );
    }

    #[test]
    fn deserializes_untagged() {
        let value: Value = serde_json::from_str(r#"{"a": [1, "two", null, true]}"#).unwrap();
        assert_eq!(value, v(json!({"a": [1.0, "two", null, true]})));
    }
}

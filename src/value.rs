//! The parameter value type produced by [`Config`](crate::Config).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::inject::{float_to_long, float_to_text, Converter, Object};

/// A raw parameter value.
///
/// Deserializes from any self-describing format as an untagged scalar.
#[derive(Clone, Deserialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// A shared value handed to enum and interface fields as-is.
    #[serde(skip)]
    Object(Object),
}

impl Value {
    /// Wraps any value for pass-through injection.
    ///
    /// For an interface field of type `Arc<dyn Trait>`, pass the `Arc<dyn Trait>`
    /// itself.
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Value::Object(Arc::new(value))
    }

    /// Converts a scalar TOML value. Arrays and tables have no flat form.
    pub fn from_toml(value: toml::Value) -> Option<Self> {
        match value {
            toml::Value::String(s) => Some(Value::String(s)),
            toml::Value::Integer(i) => Some(Value::Integer(i)),
            toml::Value::Float(f) => Some(Value::Float(f)),
            toml::Value::Boolean(b) => Some(Value::Boolean(b)),
            toml::Value::Datetime(dt) => Some(Value::String(dt.to_string())),
            toml::Value::Array(_) | toml::Value::Table(_) => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Object(_) => f.write_str("Object(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl Converter for Value {
    fn to_int(&self) -> Option<i32> {
        self.to_long().and_then(|v| i32::try_from(v).ok())
    }

    fn to_long(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(f) => float_to_long(*f),
            Value::String(s) => s.to_long(),
            Value::Boolean(_) | Value::Object(_) => None,
        }
    }

    fn to_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::String(s) => s.to_bool(),
            _ => None,
        }
    }

    fn to_text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(float_to_text(*f)),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Object(_) => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    fn to_object(&self) -> Option<Object> {
        match self {
            Value::Object(object) => Some(Arc::clone(object)),
            Value::String(s) => Some(Arc::new(s.clone())),
            Value::Integer(i) => Some(Arc::new(*i)),
            Value::Float(f) => Some(Arc::new(*f)),
            Value::Boolean(b) => Some(Arc::new(*b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_deserialize_untagged_scalars() {
        let map: BTreeMap<String, Value> = toml::from_str(
            r#"
            name = "edge"
            port = 8080
            ratio = 0.5
            debug = true
            "#,
        )
        .unwrap();
        assert_eq!(map["name"], Value::from("edge"));
        assert_eq!(map["port"], Value::Integer(8080));
        assert_eq!(map["ratio"], Value::Float(0.5));
        assert_eq!(map["debug"], Value::Boolean(true));
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Value::from("17").to_int(), Some(17));
        assert_eq!(Value::Float(3.0).to_long(), Some(3));
        assert_eq!(Value::Float(3.5).to_long(), None);
        assert_eq!(Value::Integer(i64::MAX).to_int(), None);
        assert_eq!(Value::Boolean(true).to_int(), None);
    }

    #[test]
    fn test_text_form() {
        assert_eq!(Value::Integer(5).to_text().as_deref(), Some("5"));
        assert_eq!(Value::Boolean(false).to_text().as_deref(), Some("false"));
        assert_eq!(Value::object(5u8).to_text(), None);
    }

    #[test]
    fn test_float_text_keeps_fraction() {
        assert_eq!(Value::Float(1.0).to_text().as_deref(), Some("1.0"));
        assert_eq!(Value::Float(2.5).to_text().as_deref(), Some("2.5"));
        assert_eq!(Value::Float(-3.0).to_text().as_deref(), Some("-3.0"));
    }

    #[test]
    fn test_from_toml_skips_collections() {
        assert!(Value::from_toml(toml::Value::Array(vec![])).is_none());
        assert_eq!(
            Value::from_toml(toml::Value::Integer(1)),
            Some(Value::Integer(1))
        );
    }
}

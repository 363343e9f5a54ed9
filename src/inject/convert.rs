//! Scalar coercion of raw parameter values and the conversion policy that maps
//! a raw value onto a declared field type.

use std::any::Any;
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use super::{FieldError, TypeDescriptor};

/// Shared, type-erased value passed through to enum and interface fields.
pub type Object = Arc<dyn Any + Send + Sync>;

/// Coerces a raw parameter value into the scalar kinds a field can declare.
///
/// Every method reports "no value" with `None`; there are no sentinels.
pub trait Converter {
    fn to_int(&self) -> Option<i32>;

    fn to_long(&self) -> Option<i64>;

    fn to_bool(&self) -> Option<bool>;

    /// String form of the value, used for string fields and placeholders.
    fn to_text(&self) -> Option<String>;

    /// Borrowed string content, if the value is a string.
    fn as_str(&self) -> Option<&str> {
        None
    }

    /// The value itself as a shared object, for pass-through conversions.
    fn to_object(&self) -> Option<Object> {
        None
    }
}

/// A read-only, string-keyed source of raw values.
pub trait Parameters {
    type Value: Converter + ?Sized;

    fn lookup(&self, key: &str) -> Option<&Self::Value>;
}

impl<K, V, S> Parameters for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: Converter,
    S: BuildHasher,
{
    type Value = V;

    fn lookup(&self, key: &str) -> Option<&V> {
        self.get(key)
    }
}

impl<K, V> Parameters for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: Converter,
{
    type Value = V;

    fn lookup(&self, key: &str) -> Option<&V> {
        self.get(key)
    }
}

impl Parameters for toml::Table {
    type Value = toml::Value;

    fn lookup(&self, key: &str) -> Option<&toml::Value> {
        self.get(key)
    }
}

impl<P: Parameters + ?Sized> Parameters for &P {
    type Value = P::Value;

    fn lookup(&self, key: &str) -> Option<&Self::Value> {
        (**self).lookup(key)
    }
}

/// A raw value converted to the kind of its target field.
#[derive(Clone)]
pub enum Injected {
    Int(i32),
    Long(i64),
    Bool(bool),
    Text(String),
    /// Ordinal of an enum variant.
    Variant(usize),
    Object(Object),
}

impl Injected {
    pub fn kind(&self) -> &'static str {
        match self {
            Injected::Int(_) => "int",
            Injected::Long(_) => "long",
            Injected::Bool(_) => "bool",
            Injected::Text(_) => "string",
            Injected::Variant(_) => "enum",
            Injected::Object(_) => "object",
        }
    }
}

impl std::fmt::Debug for Injected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Injected::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Injected::Long(v) => f.debug_tuple("Long").field(v).finish(),
            Injected::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Injected::Text(v) => f.debug_tuple("Text").field(v).finish(),
            Injected::Variant(v) => f.debug_tuple("Variant").field(v).finish(),
            Injected::Object(_) => f.write_str("Object(..)"),
        }
    }
}

/// Converts `raw` to the kind declared by `declared`.
///
/// `Ok(None)` means the value has no representation of that kind and the
/// field must be left alone. The only error is an enum name that matches no
/// variant.
pub fn convert<V>(declared: &TypeDescriptor, raw: &V) -> Result<Option<Injected>, FieldError>
where
    V: Converter + ?Sized,
{
    let converted = match declared {
        TypeDescriptor::Int => raw.to_int().map(Injected::Int),
        TypeDescriptor::Long => raw.to_long().map(Injected::Long),
        TypeDescriptor::Bool => raw.to_bool().map(Injected::Bool),
        TypeDescriptor::Enum(descriptor) => {
            let object = raw.to_object();
            if let Some(ordinal) = object
                .as_deref()
                .and_then(|object| descriptor.ordinal_of(object))
            {
                Some(Injected::Variant(ordinal))
            } else if let Some(name) = raw.as_str().or_else(|| {
                object
                    .as_deref()
                    .and_then(|object| object.downcast_ref::<String>())
                    .map(String::as_str)
            }) {
                let ordinal = descriptor
                    .lookup(name)
                    .ok_or_else(|| FieldError::UnknownVariant {
                        enum_name: descriptor.name(),
                        value: name.to_string(),
                    })?;
                Some(Injected::Variant(ordinal))
            } else {
                None
            }
        }
        TypeDescriptor::Interface(_) => raw.to_object().map(Injected::Object),
        TypeDescriptor::Str => raw.to_text().map(Injected::Text),
        TypeDescriptor::Unsupported(_) => None,
    };
    Ok(converted)
}

fn parse_int(s: &str) -> Option<i32> {
    s.trim().parse().ok()
}

fn parse_long(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// String form of a float that keeps the fractional part, so `1.0` stays
/// `"1.0"` rather than collapsing to the integer spelling.
pub(crate) fn float_to_text(f: f64) -> String {
    let text = f.to_string();
    if f.is_finite() && !text.contains('.') {
        text + ".0"
    } else {
        text
    }
}

/// Integral floats convert; anything with a fraction does not.
pub(crate) fn float_to_long(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl Converter for str {
    fn to_int(&self) -> Option<i32> {
        parse_int(self)
    }

    fn to_long(&self) -> Option<i64> {
        parse_long(self)
    }

    fn to_bool(&self) -> Option<bool> {
        parse_bool(self)
    }

    fn to_text(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn as_str(&self) -> Option<&str> {
        Some(self)
    }

    fn to_object(&self) -> Option<Object> {
        Some(Arc::new(self.to_string()))
    }
}

impl Converter for String {
    fn to_int(&self) -> Option<i32> {
        self.as_str().to_int()
    }

    fn to_long(&self) -> Option<i64> {
        self.as_str().to_long()
    }

    fn to_bool(&self) -> Option<bool> {
        self.as_str().to_bool()
    }

    fn to_text(&self) -> Option<String> {
        Some(self.clone())
    }

    fn as_str(&self) -> Option<&str> {
        Some(self)
    }

    fn to_object(&self) -> Option<Object> {
        Some(Arc::new(self.clone()))
    }
}

impl Converter for i64 {
    fn to_int(&self) -> Option<i32> {
        i32::try_from(*self).ok()
    }

    fn to_long(&self) -> Option<i64> {
        Some(*self)
    }

    fn to_bool(&self) -> Option<bool> {
        None
    }

    fn to_text(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn to_object(&self) -> Option<Object> {
        Some(Arc::new(*self))
    }
}

impl Converter for i32 {
    fn to_int(&self) -> Option<i32> {
        Some(*self)
    }

    fn to_long(&self) -> Option<i64> {
        Some(i64::from(*self))
    }

    fn to_bool(&self) -> Option<bool> {
        None
    }

    fn to_text(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn to_object(&self) -> Option<Object> {
        Some(Arc::new(*self))
    }
}

impl Converter for bool {
    fn to_int(&self) -> Option<i32> {
        None
    }

    fn to_long(&self) -> Option<i64> {
        None
    }

    fn to_bool(&self) -> Option<bool> {
        Some(*self)
    }

    fn to_text(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn to_object(&self) -> Option<Object> {
        Some(Arc::new(*self))
    }
}

impl Converter for toml::Value {
    fn to_int(&self) -> Option<i32> {
        self.to_long().and_then(|v| i32::try_from(v).ok())
    }

    fn to_long(&self) -> Option<i64> {
        match self {
            toml::Value::Integer(i) => Some(*i),
            toml::Value::Float(f) => float_to_long(*f),
            toml::Value::String(s) => parse_long(s),
            _ => None,
        }
    }

    fn to_bool(&self) -> Option<bool> {
        match self {
            toml::Value::Boolean(b) => Some(*b),
            toml::Value::String(s) => parse_bool(s),
            _ => None,
        }
    }

    fn to_text(&self) -> Option<String> {
        match self {
            toml::Value::String(s) => Some(s.clone()),
            toml::Value::Integer(i) => Some(i.to_string()),
            toml::Value::Float(f) => Some(float_to_text(*f)),
            toml::Value::Boolean(b) => Some(b.to_string()),
            toml::Value::Datetime(dt) => Some(dt.to_string()),
            toml::Value::Array(_) | toml::Value::Table(_) => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        toml::Value::as_str(self)
    }

    fn to_object(&self) -> Option<Object> {
        Some(Arc::new(self.clone()))
    }
}

impl<T: Converter + ?Sized> Converter for &T {
    fn to_int(&self) -> Option<i32> {
        (**self).to_int()
    }

    fn to_long(&self) -> Option<i64> {
        (**self).to_long()
    }

    fn to_bool(&self) -> Option<bool> {
        (**self).to_bool()
    }

    fn to_text(&self) -> Option<String> {
        (**self).to_text()
    }

    fn as_str(&self) -> Option<&str> {
        (**self).as_str()
    }

    fn to_object(&self) -> Option<Object> {
        (**self).to_object()
    }
}

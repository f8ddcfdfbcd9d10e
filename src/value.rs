use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Represents the value of a feature flag.
///
/// Only [`Value::Bool`] flags are managed by the [`crate::Inspector`], every other
/// variant passes through overrides and evaluation untouched.
///
/// # Examples
///
/// ```rust
/// use flag_inspector::Value;
///
/// let bool_val = Value::Bool(true);
/// let text_val: Value = "blue".into();
/// ```
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A bool feature flag's value.
    Bool(bool),
    /// A whole number flag value.
    Int(i64),
    /// A decimal number flag value.
    Float(f64),
    /// A text flag value.
    String(String),
}

impl Value {
    /// Reads the value as `bool`. Returns [`None`] if it's not a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(val) => Some(*val),
            _ => None,
        }
    }

    /// Reads the value as `i64`. Returns [`None`] if it's not a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(val) => Some(*val),
            _ => None,
        }
    }

    /// Reads the value as `f64`. Returns [`None`] if it's not a [`Value::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(val) => Some(*val),
            _ => None,
        }
    }

    /// Reads the value as [`String`]. Returns [`None`] if it's not a [`Value::String`].
    pub fn as_str(&self) -> Option<String> {
        match self {
            Value::String(val) => Some(val.clone()),
            _ => None,
        }
    }

    /// Converts a JSON scalar into a [`Value`]. Arrays, objects and `null` have no
    /// flag representation and yield [`None`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flag_inspector::Value;
    ///
    /// let json = serde_json::json!(3);
    /// assert_eq!(Value::from_json_val(&json), Some(Value::Int(3)));
    /// assert_eq!(Value::from_json_val(&serde_json::Value::Null), None);
    /// ```
    pub fn from_json_val(json_val: &serde_json::Value) -> Option<Value> {
        match json_val {
            serde_json::Value::Bool(val) => Some(Value::Bool(*val)),
            serde_json::Value::String(val) => Some(Value::String(val.clone())),
            serde_json::Value::Number(num) => num
                .as_i64()
                .map(Value::Int)
                .or_else(|| num.as_f64().map(Value::Float)),
            _ => None,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(val) => write!(f, "{val}"),
            Value::Int(val) => write!(f, "{val}"),
            Value::Float(val) => write!(f, "{val}"),
            Value::String(val) => f.write_str(val),
        }
    }
}

/// Represents a primitive type that can describe the value of a feature flag.
pub trait ValuePrimitive: Into<Value> {
    /// Reads the primitive value from a [`Value`].
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! primitive_impl {
    ($ob:ident $to:ident $as_m:ident $t:ty) => (
        from_val_to_enum!($ob $to $t);

        impl ValuePrimitive for $t {
            fn from_value(value: &Value) -> Option<Self> {
                value.$as_m()
            }
        }
    )
}

primitive_impl!(Value String as_str String);
primitive_impl!(Value Float as_float f64);
primitive_impl!(Value Int as_int i64);
primitive_impl!(Value Bool as_bool bool);
from_val_to_enum_into!(Value String &str);

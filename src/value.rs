//! The internal execution value domain.
//!
//! Resolvers, coerced variables, and coerced arguments all traffic in
//! [`Value`]. It is distinct from both the AST literal type
//! ([`ast::Value`][crate::ast::Value], which still contains variable
//! references) and from serialized JSON: the boundary modules (scalar
//! `parse`/`serialize`, variable coercion, result encoding) bridge between
//! raw transport values and this domain.

use crate::ast::Name;
use crate::collections::IndexMap;
use crate::response::JsonValue;
use std::fmt;

/// A runtime GraphQL value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// An enum symbol: the name of an enum value, carried when no explicit
    /// internal value was attached to it.
    Enum(Name),
    List(Vec<Value>),
    Object(ValueMap),
}

/// An ordered map of runtime values, keyed by response key, input field name,
/// argument name, or variable name.
pub type ValueMap = IndexMap<String, Value>;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The numeric value of an `Int` or `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ValueMap> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a property of an object value.
    ///
    /// This is what field resolution falls back to when a field has no
    /// resolver: read the property named like the field from the parent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Convert a raw JSON value into the internal domain.
    ///
    /// Numbers become `Int` when they are integral, `Float` otherwise.
    /// Object key order is preserved.
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(value) => Self::Boolean(*value),
            JsonValue::Number(n) => {
                if let Some(int) = n.as_i64() {
                    Self::Int(int)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(value) => Self::String(value.as_str().to_owned()),
            JsonValue::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            JsonValue::Object(map) => Self::Object(
                map.iter()
                    .map(|(key, value)| (key.as_str().to_owned(), Self::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// Convert into a raw JSON value.
    ///
    /// Enum symbols become their name as a string. This is the passthrough
    /// used by custom scalars; typed serialization (enum reverse lookup,
    /// built-in scalar checks) happens in result coercion instead.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Boolean(value) => (*value).into(),
            Self::Int(value) => (*value).into(),
            Self::Float(value) => (*value).into(),
            Self::String(value) => value.as_str().into(),
            Self::Enum(name) => name.as_str().into(),
            Self::List(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => JsonValue::Object(
                map.iter()
                    .map(|(key, value)| (key.as_str().into(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Formats the value as a GraphQL literal: strings quoted, enum symbols bare.
///
/// Used for the `defaultValue` field of introspection and in error messages.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value:?}"),
            Self::Enum(name) => write!(f, "{name}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Name> for Value {
    fn from(name: Name) -> Self {
        Self::Enum(name)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[(&str, T); N]> for Value {
    fn from(entries: [(&str, T); N]) -> Self {
        Self::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_owned(), value.into()))
                .collect(),
        )
    }
}

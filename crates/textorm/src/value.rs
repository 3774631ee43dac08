//! Scalar and value types that flow through conditions and VALUES clauses.
//!
//! [`Scalar`] is the closed set of cell types a statement can carry. [`Value`]
//! is what builder calls accept: a scalar, a list of scalars (only legal with
//! `IN`/`NOT IN`), a [`RawSql`] fragment, or the unset sentinel.

use serde::{Deserialize, Serialize};

/// A single cell value.
///
/// Serializes untagged, so a [`crate::row::Row`] round-trips as plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Returns the text content if this is a `Text` scalar.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content, coercing numeric text (driver count
    /// columns often arrive as text).
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Null => write!(f, "NULL"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<serde_json::Value> for Scalar {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Scalar::Null,
            serde_json::Value::Bool(b) => Scalar::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Scalar::Int(i)
                } else {
                    Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Scalar::Text(s),
            // Nested shapes are carried as their JSON text.
            other => Scalar::Text(other.to_string()),
        }
    }
}

/// Pre-formed statement text, inlined verbatim and exempt from
/// escaping/quoting. Construct via [`crate::util::raw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSql(pub(crate) String);

impl RawSql {
    /// The wrapped fragment text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A value accepted by builder calls.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single scalar.
    Scalar(Scalar),
    /// A list of scalars, only legal with `IN`/`NOT IN`.
    List(Vec<Scalar>),
    /// A raw fragment, inlined verbatim.
    Raw(RawSql),
    /// The unset sentinel. Rejected by `set`/`set_many`.
    Unset,
}

impl Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(s) => s.serialize(serializer),
            Value::List(items) => items.serialize(serializer),
            Value::Raw(r) => serializer.serialize_str(r.as_str()),
            Value::Unset => serializer.serialize_none(),
        }
    }
}

macro_rules! scalar_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(value: $t) -> Self {
                    Scalar::Int(value as i64)
                }
            }
        )*
    };
}

scalar_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(value as f64)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Scalar::Null,
        }
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Scalar(value)
    }
}

macro_rules! value_via_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Scalar(value.into())
                }
            }
        )*
    };
}

value_via_scalar!(i8, i16, i32, i64, u8, u16, u32, f32, f64, bool, &str, String);

impl<T: Into<Scalar>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        Value::Scalar(value.map_or(Scalar::Null, Into::into))
    }
}

impl From<RawSql> for Value {
    fn from(value: RawSql) -> Self {
        Value::Raw(value)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use super::error::SchemaError;

/// The kind of value a declared field holds. Only supported kinds take part in
/// cloning, persistence and sync.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Str,
    Char,
    /// Ordered sequence of the inner kind
    List(Box<ValueKind>),
    /// String-keyed mapping to the inner kind
    Map(Box<ValueKind>),
    /// A value the copy/serialization engine knows nothing about (handles,
    /// fonts, textures, random generators). Never eligible.
    Opaque(&'static str),
}

impl ValueKind {
    pub fn list_of(inner: ValueKind) -> Self {
        ValueKind::List(Box::new(inner))
    }

    pub fn map_of(inner: ValueKind) -> Self {
        ValueKind::Map(Box::new(inner))
    }

    pub fn is_supported(&self) -> bool {
        match self {
            ValueKind::Opaque(_) => false,
            ValueKind::List(inner) | ValueKind::Map(inner) => inner.is_supported(),
            _ => true,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            ValueKind::Bool | ValueKind::Int | ValueKind::Float | ValueKind::Str | ValueKind::Char
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Bool => write!(f, "bool"),
            ValueKind::Int => write!(f, "int"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::Str => write!(f, "str"),
            ValueKind::Char => write!(f, "char"),
            ValueKind::List(inner) => write!(f, "list<{}>", inner),
            ValueKind::Map(inner) => write!(f, "map<{}>", inner),
            ValueKind::Opaque(name) => write!(f, "opaque<{}>", name),
        }
    }
}

/// A field value as seen by the copy, persistence and sync engines.
/// Cloning a `Value` is a deep copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Whether this value can be stored in a field of the given kind.
    /// Empty lists and maps match any element kind.
    pub fn matches(&self, kind: &ValueKind) -> bool {
        match (self, kind) {
            (Value::Bool(_), ValueKind::Bool)
            | (Value::Int(_), ValueKind::Int)
            | (Value::Float(_), ValueKind::Float)
            | (Value::Str(_), ValueKind::Str)
            | (Value::Char(_), ValueKind::Char) => true,
            (Value::List(items), ValueKind::List(inner)) => {
                items.iter().all(|item| item.matches(inner))
            }
            (Value::Map(entries), ValueKind::Map(inner)) => {
                entries.values().all(|item| item.matches(inner))
            }
            _ => false,
        }
    }

    pub fn type_label(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Char(_) => "char",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Text form used by property maps. Containers have no text form.
    pub fn repr(&self) -> Option<String> {
        match self {
            Value::Bool(value) => Some(value.to_string()),
            Value::Int(value) => Some(value.to_string()),
            Value::Float(value) => Some(value.to_string()),
            Value::Str(value) => Some(value.clone()),
            Value::Char(value) => Some(value.to_string()),
            Value::List(_) | Value::Map(_) => None,
        }
    }

    /// Parses the text form of a scalar kind
    pub fn parse(kind: &ValueKind, text: &str) -> Option<Value> {
        match kind {
            ValueKind::Bool => text.trim().parse().ok().map(Value::Bool),
            ValueKind::Int => text.trim().parse().ok().map(Value::Int),
            ValueKind::Float => text.trim().parse().ok().map(Value::Float),
            ValueKind::Str => Some(Value::Str(text.to_string())),
            ValueKind::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Some(Value::Char(ch)),
                    _ => None,
                }
            }
            ValueKind::List(_) | ValueKind::Map(_) | ValueKind::Opaque(_) => None,
        }
    }

    /// Converts into a concrete field type, for use inside `set_field`
    pub fn take<T: FromValue>(self, type_name: &'static str, field: &str) -> Result<T, SchemaError> {
        let label = self.type_label();
        T::from_value(self).ok_or_else(|| SchemaError::KindMismatch {
            type_name,
            field: field.to_string(),
            expected: T::EXPECTED.to_string(),
            actual: label,
        })
    }
}

/// Conversion out of a `Value`, `None` when the kind does not fit
pub trait FromValue: Sized {
    const EXPECTED: &'static str;

    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(inner) => Some(inner),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "int";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Int(inner) => Some(inner),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "int (i32 range)";

    fn from_value(value: Value) -> Option<Self> {
        i64::from_value(value).and_then(|inner| i32::try_from(inner).ok())
    }
}

impl FromValue for u32 {
    const EXPECTED: &'static str = "int (u32 range)";

    fn from_value(value: Value) -> Option<Self> {
        i64::from_value(value).and_then(|inner| u32::try_from(inner).ok())
    }
}

impl FromValue for usize {
    const EXPECTED: &'static str = "int (usize range)";

    fn from_value(value: Value) -> Option<Self> {
        i64::from_value(value).and_then(|inner| usize::try_from(inner).ok())
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(inner) => Some(inner),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: Value) -> Option<Self> {
        f64::from_value(value).map(|inner| inner as f32)
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "str";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(inner) => Some(inner),
            _ => None,
        }
    }
}

impl FromValue for char {
    const EXPECTED: &'static str = "char";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Char(inner) => Some(inner),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    const EXPECTED: &'static str = "list";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    const EXPECTED: &'static str = "map";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(key, item)| T::from_value(item).map(|item| (key, item)))
                .collect(),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

/// Saturates at `i64::MAX`
impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(value: &[T]) -> Self {
        Value::List(value.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(value: BTreeMap<String, T>) -> Self {
        Value::Map(value.into_iter().map(|(key, item)| (key, item.into())).collect())
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// A filter operand as it arrives from the filter builder.
///
/// JSON input maps directly onto the variants: `true` becomes `Boolean`,
/// whole numbers become `Int`, other numbers `Float`, strings `String` and
/// arrays `List`. An absent or `null` operand is modelled as `None` on the
/// owning condition rather than as a variant here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
}

impl Value {
    /// True for a string that is empty after trimming, or an empty list.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::String(s) => s.trim().is_empty(),
            Value::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Returns a copy with surrounding whitespace removed from string values.
    pub fn trimmed(&self) -> Value {
        match self {
            Value::String(s) => Value::String(s.trim().to_string()),
            other => other.clone(),
        }
    }

    /// Coerces the operand into the element list of an `in` filter.
    ///
    /// Strings are split on commas; every string element is trimmed and
    /// blank elements are dropped. Non-string elements are kept as they are.
    pub fn to_list(&self) -> Vec<Value> {
        match self {
            Value::String(s) => split_comma_list(s).into_iter().map(Value::String).collect(),
            Value::List(items) => items
                .iter()
                .filter(|item| !item.is_blank())
                .map(Value::trimmed)
                .collect(),
            other => vec![other.clone()],
        }
    }

    /// Like [`Value::to_list`] but renders every element as a string.
    pub fn to_string_list(&self) -> Vec<String> {
        match self {
            Value::String(s) => split_comma_list(s),
            Value::List(items) => items
                .iter()
                .map(|item| item.to_string().trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
            other => vec![other.to_string()],
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self)
    }
}

fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Renders the operand as plain text, the form used inside LIKE patterns,
/// regular expressions and wildcard queries.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
            Value::List(items) => {
                let joined = items
                    .iter()
                    .map(|item| item.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "{joined}")
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Boolean(v) => serde_json::Value::Bool(*v),
            Value::Int(v) => serde_json::Value::from(*v),
            Value::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(v) => serde_json::Value::String(v.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

//! FILENAME: frame-engine/src/value.rs
//! PURPOSE: Defines the value and type tags carried by a single field.
//! CONTEXT: A `FieldValue` is one row of one column. Time values are stored as
//! `Number` epoch milliseconds; the field's `FieldType` says how to read them.
//! `List` only appears as the result of list-valued reducers.

use serde::{Deserialize, Serialize};

/// The value type tag of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Time,
    Number,
    String,
    Boolean,
    #[default]
    Other,
}

impl FieldType {
    /// Parses a type name as it appears in matcher options ("number", "time", ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "time" => Some(FieldType::Time),
            "number" => Some(FieldType::Number),
            "string" => Some(FieldType::String),
            "boolean" => Some(FieldType::Boolean),
            "other" => Some(FieldType::Other),
            _ => None,
        }
    }
}

/// A single value in a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Number(f64),
    Text(String),
    Boolean(bool),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns the number only if the value is stored as a number.
    pub fn number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Lenient numeric reading: numbers as-is, numeric text parsed,
    /// booleans as 1/0. NaN results are treated as "not a number".
    pub fn to_number(&self) -> Option<f64> {
        let n = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
            FieldValue::Boolean(b) => {
                if *b { 1.0 } else { 0.0 }
            }
            FieldValue::Null | FieldValue::List(_) => return None,
        };
        if n.is_nan() {
            None
        } else {
            Some(n)
        }
    }

    /// Text reading of a scalar value. Lists and nulls have no text form.
    pub fn to_text(&self) -> Option<String> {
        match self {
            FieldValue::Null | FieldValue::List(_) => None,
            other => Some(other.display_value()),
        }
    }

    /// Text used to key a value mapping. Signed zero folds to "0" and
    /// infinities are spelled out.
    pub fn mapping_key(&self) -> Option<String> {
        match self {
            FieldValue::Number(n) if n.is_infinite() => Some(
                if *n > 0.0 { "Infinity" } else { "-Infinity" }.to_string(),
            ),
            FieldValue::Number(n) => Some(FieldValue::Number(*n + 0.0).display_value()),
            other => other.to_text(),
        }
    }

    /// Returns the display value as a String.
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            FieldValue::Text(s) => s.clone(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::List(items) => items
                .iter()
                .map(FieldValue::display_value)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

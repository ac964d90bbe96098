//! FILENAME: frame-engine/src/frame.rs
//! PURPOSE: Defines `Field` (a typed column) and `Frame` (an ordered set of fields).
//! CONTEXT: Fields are value objects. Transformations clone and rebuild them
//! rather than mutating the caller's frames.

use serde::{Deserialize, Serialize};
use crate::field_config::FieldConfig;
use crate::value::{FieldType, FieldValue};

// ============================================================================
// FIELD
// ============================================================================

/// A named, typed column of values with optional display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,

    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    #[serde(default)]
    pub values: Vec<FieldValue>,

    #[serde(default)]
    pub config: FieldConfig,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType, values: Vec<FieldValue>) -> Self {
        Field {
            name: name.into(),
            field_type,
            values,
            config: FieldConfig::default(),
        }
    }

    pub fn number(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(
            name,
            FieldType::Number,
            values.iter().map(|v| FieldValue::Number(*v)).collect(),
        )
    }

    /// Time field; values are epoch milliseconds.
    pub fn time(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(
            name,
            FieldType::Time,
            values.iter().map(|v| FieldValue::Number(*v)).collect(),
        )
    }

    pub fn text(name: impl Into<String>, values: &[&str]) -> Self {
        Self::new(
            name,
            FieldType::String,
            values.iter().map(|v| FieldValue::Text(v.to_string())).collect(),
        )
    }

    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// The name this field is shown and looked up under.
    pub fn display_name(&self) -> &str {
        self.config.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Value at `row`, or `Null` past the end of the stored values.
    pub fn value_at(&self, row: usize) -> &FieldValue {
        static NULL: FieldValue = FieldValue::Null;
        self.values.get(row).unwrap_or(&NULL)
    }

    pub fn is_numeric(&self) -> bool {
        self.field_type == FieldType::Number
    }
}

// ============================================================================
// FRAME
// ============================================================================

/// An ordered sequence of fields sharing one row count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Identifier used to pick a frame out of a set (e.g. the config frame).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,

    pub fields: Vec<Field>,

    /// Row count shared by all fields.
    pub length: usize,
}

impl Frame {
    /// Builds a frame; the row count is the longest field's length.
    pub fn new(fields: Vec<Field>) -> Self {
        let length = fields.iter().map(|f| f.values.len()).max().unwrap_or(0);
        Frame {
            ref_id: None,
            fields,
            length,
        }
    }

    pub fn with_ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Finds a field by display name.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.display_name() == name)
    }

    pub fn has_ref_id(&self, ref_id: &str) -> bool {
        self.ref_id.as_deref() == Some(ref_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_length_from_longest_field() {
        let frame = Frame::new(vec![
            Field::time("Time", &[1.0, 2.0]),
            Field::number("Max", &[1.0, 10.0, 50.0]),
        ]);
        assert_eq!(frame.length, 3);
        assert!(frame.field(0).unwrap().value_at(2).is_null());
    }

    #[test]
    fn test_display_name_prefers_config() {
        let field = Field::number("Value", &[1.0]).with_config(FieldConfig {
            display_name: Some("SeriesA".to_string()),
            ..Default::default()
        });
        assert_eq!(field.display_name(), "SeriesA");

        let frame = Frame::new(vec![field]);
        assert!(frame.field_by_name("SeriesA").is_some());
        assert!(frame.field_by_name("Value").is_none());
    }

    #[test]
    fn test_ref_id() {
        let frame = Frame::new(vec![]).with_ref_id("A");
        assert!(frame.has_ref_id("A"));
        assert!(!frame.has_ref_id("B"));
        assert!(!Frame::new(vec![]).has_ref_id("A"));
    }
}

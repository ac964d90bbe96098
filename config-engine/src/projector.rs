//! FILENAME: config-engine/src/projector.rs
//! PURPOSE: Projects one row of the reduced config frame into a `FieldConfig` fragment.
//! CONTEXT: Each non-ignored field hands its reduced value to its handler.
//! The three `mappings.*` handlers don't write config directly; they fill a
//! shared accumulator keyed by row index, which is turned into a single
//! value-mapping entry once every field has been visited.

use std::collections::BTreeMap;
use log::{trace, warn};
use frame_engine::{FieldConfig, FieldValue, Frame, ValueMapping, ValueMappingResult};
use crate::error::TransformError;
use crate::handlers::HandlerContext;
use crate::mapping::MappingResolution;

// ============================================================================
// VALUE MAPPING ACCUMULATOR
// ============================================================================

/// Which column of a value mapping a handler supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMappingPart {
    Value,
    Color,
    Text,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ValueMappingRow {
    value: Option<String>,
    color: Option<String>,
    text: Option<String>,
}

/// Lines up `mappings.value` / `.color` / `.text` entries by index.
#[derive(Debug, Clone, Default)]
pub struct ValueMappingAccumulator {
    rows: BTreeMap<usize, ValueMappingRow>,
}

impl ValueMappingAccumulator {
    /// Records `value` for `part`. A list spreads over consecutive indices
    /// starting at `row_index`; a scalar lands at `row_index`.
    pub fn add(&mut self, part: ValueMappingPart, value: &FieldValue, row_index: usize) -> bool {
        match value {
            FieldValue::List(items) => {
                for (offset, item) in items.iter().enumerate() {
                    self.set(part, item, row_index + offset);
                }
                true
            }
            FieldValue::Null => false,
            scalar => {
                self.set(part, scalar, row_index);
                true
            }
        }
    }

    fn set(&mut self, part: ValueMappingPart, value: &FieldValue, index: usize) {
        let text = match part {
            ValueMappingPart::Value => value.mapping_key(),
            ValueMappingPart::Color | ValueMappingPart::Text => value.to_text(),
        };
        let Some(text) = text else {
            return;
        };
        let row = self.rows.entry(index).or_default();
        match part {
            ValueMappingPart::Value => row.value = Some(text),
            ValueMappingPart::Color => row.color = Some(text),
            ValueMappingPart::Text => row.text = Some(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One `value` mapping with an option per row that has a value.
    pub fn finish(self) -> Option<ValueMapping> {
        let options: BTreeMap<String, ValueMappingResult> = self
            .rows
            .into_iter()
            .filter_map(|(index, row)| {
                let key = row.value?;
                Some((
                    key,
                    ValueMappingResult {
                        text: row.text,
                        color: row.color,
                        index: Some(index),
                    },
                ))
            })
            .collect();

        if options.is_empty() {
            None
        } else {
            Some(ValueMapping::Value { options })
        }
    }
}

// ============================================================================
// CONFIG ACCUMULATOR
// ============================================================================

/// The fragment under construction, handed to every handler.
#[derive(Debug, Clone, Default)]
pub struct ConfigAccumulator {
    pub config: FieldConfig,
    pub value_mappings: ValueMappingAccumulator,
}

impl ConfigAccumulator {
    pub fn finish(self) -> FieldConfig {
        let mut config = self.config;
        if let Some(mapping) = self.value_mappings.finish() {
            config.mappings.get_or_insert_with(Vec::new).push(mapping);
        }
        config
    }
}

// ============================================================================
// PROJECTION
// ============================================================================

/// Builds the config fragment for `row_index` of the reduced config frame.
pub fn project_field_config(
    reduced: &Frame,
    row_index: usize,
    resolution: &MappingResolution,
) -> Result<FieldConfig, TransformError> {
    let mut acc = ConfigAccumulator::default();

    for field in &reduced.fields {
        let name = field.display_name();
        let mapping = resolution.require(name)?;

        let Some(handler) = mapping.handler() else {
            continue;
        };

        let value = field.value_at(row_index);
        if value.is_null() {
            trace!("field '{}' reduced to null, '{}' not set", name, mapping.handler_key);
            continue;
        }

        let ctx = HandlerContext {
            arguments: &mapping.handler_arguments,
            row_index,
        };
        if !(handler.apply)(&mut acc, value, &ctx) {
            warn!(
                "value {:?} of field '{}' cannot be used for '{}'",
                value, name, mapping.handler_key
            );
        }
    }

    Ok(acc.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_mapping_rows_line_up_by_index() {
        let mut acc = ValueMappingAccumulator::default();
        acc.add(
            ValueMappingPart::Text,
            &FieldValue::List(vec!["one".into(), "two".into()]),
            0,
        );
        acc.add(
            ValueMappingPart::Value,
            &FieldValue::List(vec![FieldValue::Number(1.0), FieldValue::Number(2.0)]),
            0,
        );
        acc.add(
            ValueMappingPart::Color,
            &FieldValue::List(vec!["red".into(), "blue".into()]),
            0,
        );

        let Some(ValueMapping::Value { options }) = acc.finish() else {
            panic!("expected a value mapping");
        };
        assert_eq!(options.len(), 2);
        assert_eq!(
            options["2"],
            ValueMappingResult {
                text: Some("two".to_string()),
                color: Some("blue".to_string()),
                index: Some(1),
            }
        );
    }

    #[test]
    fn test_rows_without_value_are_dropped() {
        let mut acc = ValueMappingAccumulator::default();
        acc.add(ValueMappingPart::Value, &FieldValue::List(vec![FieldValue::Number(1.0), FieldValue::Null]), 0);
        acc.add(ValueMappingPart::Text, &FieldValue::List(vec!["one".into(), "two".into()]), 0);

        let Some(ValueMapping::Value { options }) = acc.finish() else {
            panic!("expected a value mapping");
        };
        assert_eq!(options.keys().collect::<Vec<_>>(), vec!["1"]);
    }

    #[test]
    fn test_scalar_uses_row_index() {
        let mut acc = ValueMappingAccumulator::default();
        assert!(acc.add(ValueMappingPart::Value, &"on".into(), 3));
        assert!(!acc.add(ValueMappingPart::Value, &FieldValue::Null, 4));

        let Some(ValueMapping::Value { options }) = acc.finish() else {
            panic!("expected a value mapping");
        };
        assert_eq!(options["on"].index, Some(3));
    }

    #[test]
    fn test_value_keys_fold_signed_zero_and_infinity() {
        let mut acc = ValueMappingAccumulator::default();
        acc.add(
            ValueMappingPart::Value,
            &FieldValue::List(vec![FieldValue::Number(-0.0), FieldValue::Number(f64::INFINITY)]),
            0,
        );

        let Some(ValueMapping::Value { options }) = acc.finish() else {
            panic!("expected a value mapping");
        };
        assert_eq!(options["0"].index, Some(0));
        assert_eq!(options["Infinity"].index, Some(1));
    }

    #[test]
    fn test_nothing_accumulated() {
        let acc = ConfigAccumulator::default();
        assert!(acc.value_mappings.is_empty());
        assert!(acc.finish().is_empty());
    }
}

//! FILENAME: config-engine/src/handlers.rs
//! PURPOSE: Registry of config handlers, keyed by handler key.
//! CONTEXT: A handler writes one reduced value into the config being
//! projected. The registry is built once per process; the resolver looks keys
//! up here so an unknown key is rejected before any frame is touched.
//!
//! `threshold1`, `threshold2`, ... all resolve to the same threshold handler.

use std::collections::HashMap;
use std::fmt;
use log::trace;
use once_cell::sync::Lazy;
use frame_engine::{FieldColor, FieldValue, ReducerId, ThresholdStep, ThresholdsConfig};
use crate::definition::HandlerArguments;
use crate::projector::{ConfigAccumulator, ValueMappingPart};

/// Built-in handler keys.
pub mod handler_key {
    pub const IGNORE: &str = "__ignore";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const DECIMALS: &str = "decimals";
    pub const UNIT: &str = "unit";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const NO_VALUE: &str = "noValue";
    pub const COLOR: &str = "color";
    pub const THRESHOLD_PREFIX: &str = "threshold";
    pub const THRESHOLD_1: &str = "threshold1";
    pub const MAPPINGS_VALUE: &str = "mappings.value";
    pub const MAPPINGS_COLOR: &str = "mappings.color";
    pub const MAPPINGS_TEXT: &str = "mappings.text";
}

/// Color of a threshold step when the mapping doesn't name one.
pub const DEFAULT_THRESHOLD_COLOR: &str = "red";

/// Per-call context handed to a handler.
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext<'a> {
    pub arguments: &'a HandlerArguments,
    /// Row of the reduced frame being projected.
    pub row_index: usize,
}

/// Writes a value into the accumulator. Returns false when the value could
/// not be used (wrong type), in which case nothing was written.
pub type HandlerFn = fn(&mut ConfigAccumulator, &FieldValue, &HandlerContext<'_>) -> bool;

pub struct ConfigHandler {
    pub key: &'static str,
    /// Reducer used when the mapping doesn't choose one.
    pub default_reducer: ReducerId,
    pub apply: HandlerFn,
}

impl fmt::Debug for ConfigHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigHandler")
            .field("key", &self.key)
            .field("default_reducer", &self.default_reducer)
            .finish()
    }
}

static REGISTRY: Lazy<HashMap<&'static str, ConfigHandler>> = Lazy::new(|| {
    let handlers = [
        ConfigHandler {
            key: handler_key::MIN,
            default_reducer: ReducerId::Min,
            apply: apply_min,
        },
        ConfigHandler {
            key: handler_key::MAX,
            default_reducer: ReducerId::Max,
            apply: apply_max,
        },
        ConfigHandler {
            key: handler_key::DECIMALS,
            default_reducer: ReducerId::LastNotNull,
            apply: apply_decimals,
        },
        ConfigHandler {
            key: handler_key::UNIT,
            default_reducer: ReducerId::LastNotNull,
            apply: apply_unit,
        },
        ConfigHandler {
            key: handler_key::DISPLAY_NAME,
            default_reducer: ReducerId::LastNotNull,
            apply: apply_display_name,
        },
        ConfigHandler {
            key: handler_key::NO_VALUE,
            default_reducer: ReducerId::LastNotNull,
            apply: apply_no_value,
        },
        ConfigHandler {
            key: handler_key::COLOR,
            default_reducer: ReducerId::LastNotNull,
            apply: apply_color,
        },
        ConfigHandler {
            key: handler_key::THRESHOLD_1,
            default_reducer: ReducerId::LastNotNull,
            apply: apply_threshold,
        },
        ConfigHandler {
            key: handler_key::MAPPINGS_VALUE,
            default_reducer: ReducerId::AllValues,
            apply: apply_mapping_value,
        },
        ConfigHandler {
            key: handler_key::MAPPINGS_COLOR,
            default_reducer: ReducerId::AllValues,
            apply: apply_mapping_color,
        },
        ConfigHandler {
            key: handler_key::MAPPINGS_TEXT,
            default_reducer: ReducerId::AllValues,
            apply: apply_mapping_text,
        },
    ];

    handlers.into_iter().map(|h| (h.key, h)).collect()
});

/// Looks up a handler by its exact key.
pub fn lookup_handler(key: &str) -> Option<&'static ConfigHandler> {
    if let Some(handler) = REGISTRY.get(key) {
        return Some(handler);
    }
    if is_threshold_key(key) {
        return REGISTRY.get(handler_key::THRESHOLD_1);
    }
    None
}

/// Default lookup for unmapped fields: a field named like a handler key
/// (ignoring case) uses that handler. Returns the canonical key too.
pub fn lookup_handler_by_field_name(name: &str) -> Option<(String, &'static ConfigHandler)> {
    if let Some(handler) = REGISTRY
        .values()
        .find(|h| h.key.eq_ignore_ascii_case(name))
    {
        return Some((handler.key.to_string(), handler));
    }
    let lower = name.to_ascii_lowercase();
    if is_threshold_key(&lower) {
        trace!("field '{}' picks up the threshold handler by name", name);
        return lookup_handler(&lower).map(|h| (lower, h));
    }
    None
}

/// `threshold` followed by a positive number.
fn is_threshold_key(key: &str) -> bool {
    key.strip_prefix(handler_key::THRESHOLD_PREFIX)
        .and_then(|n| n.parse::<u32>().ok())
        .is_some_and(|n| n > 0)
}

// ============================================================================
// HANDLERS
// ============================================================================

fn apply_min(acc: &mut ConfigAccumulator, value: &FieldValue, _: &HandlerContext<'_>) -> bool {
    value.to_number().map(|n| acc.config.min = Some(n)).is_some()
}

fn apply_max(acc: &mut ConfigAccumulator, value: &FieldValue, _: &HandlerContext<'_>) -> bool {
    value.to_number().map(|n| acc.config.max = Some(n)).is_some()
}

fn apply_decimals(acc: &mut ConfigAccumulator, value: &FieldValue, _: &HandlerContext<'_>) -> bool {
    match value.to_number() {
        Some(n) if n.is_finite() && n >= 0.0 => {
            acc.config.decimals = Some(n.round() as u32);
            true
        }
        _ => false,
    }
}

fn apply_unit(acc: &mut ConfigAccumulator, value: &FieldValue, _: &HandlerContext<'_>) -> bool {
    value.to_text().map(|s| acc.config.unit = Some(s)).is_some()
}

fn apply_display_name(acc: &mut ConfigAccumulator, value: &FieldValue, _: &HandlerContext<'_>) -> bool {
    value.to_text().map(|s| acc.config.display_name = Some(s)).is_some()
}

fn apply_no_value(acc: &mut ConfigAccumulator, value: &FieldValue, _: &HandlerContext<'_>) -> bool {
    value.to_text().map(|s| acc.config.no_value = Some(s)).is_some()
}

fn apply_color(acc: &mut ConfigAccumulator, value: &FieldValue, _: &HandlerContext<'_>) -> bool {
    value
        .to_text()
        .map(|s| acc.config.color = Some(FieldColor::fixed(s)))
        .is_some()
}

fn apply_threshold(acc: &mut ConfigAccumulator, value: &FieldValue, ctx: &HandlerContext<'_>) -> bool {
    let Some(n) = value.to_number() else {
        return false;
    };
    let color = ctx
        .arguments
        .threshold
        .as_ref()
        .and_then(|t| t.color.clone())
        .unwrap_or_else(|| DEFAULT_THRESHOLD_COLOR.to_string());

    acc.config
        .thresholds
        .get_or_insert_with(|| ThresholdsConfig::absolute(Vec::new()))
        .steps
        .push(ThresholdStep::new(n, color));
    true
}

fn apply_mapping_value(acc: &mut ConfigAccumulator, value: &FieldValue, ctx: &HandlerContext<'_>) -> bool {
    acc.value_mappings.add(ValueMappingPart::Value, value, ctx.row_index)
}

fn apply_mapping_color(acc: &mut ConfigAccumulator, value: &FieldValue, ctx: &HandlerContext<'_>) -> bool {
    acc.value_mappings.add(ValueMappingPart::Color, value, ctx.row_index)
}

fn apply_mapping_text(acc: &mut ConfigAccumulator, value: &FieldValue, ctx: &HandlerContext<'_>) -> bool {
    acc.value_mappings.add(ValueMappingPart::Text, value, ctx.row_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_exact_keys() {
        assert_eq!(lookup_handler("max").unwrap().default_reducer, ReducerId::Max);
        assert_eq!(lookup_handler("min").unwrap().default_reducer, ReducerId::Min);
        assert_eq!(
            lookup_handler("mappings.text").unwrap().default_reducer,
            ReducerId::AllValues
        );
        assert!(lookup_handler("Max").is_none());
        assert!(lookup_handler(handler_key::IGNORE).is_none());
    }

    #[test]
    fn test_threshold_keys() {
        assert_eq!(lookup_handler("threshold1").unwrap().key, "threshold1");
        assert_eq!(lookup_handler("threshold7").unwrap().key, "threshold1");
        assert!(lookup_handler("threshold").is_none());
        assert!(lookup_handler("threshold0").is_none());
        assert!(lookup_handler("thresholdX").is_none());
    }

    #[test]
    fn test_lookup_by_field_name_ignores_case() {
        let (key, _) = lookup_handler_by_field_name("Max").unwrap();
        assert_eq!(key, "max");
        let (key, _) = lookup_handler_by_field_name("DisplayName").unwrap();
        assert_eq!(key, "displayName");
        let (key, _) = lookup_handler_by_field_name("Threshold2").unwrap();
        assert_eq!(key, "threshold2");
        assert!(lookup_handler_by_field_name("Time").is_none());
    }

    #[test]
    fn test_threshold_handler_appends_steps() {
        let mut acc = ConfigAccumulator::default();
        let orange = HandlerArguments::threshold_color("orange");
        let plain = HandlerArguments::default();

        let ctx = HandlerContext { arguments: &orange, row_index: 0 };
        assert!(apply_threshold(&mut acc, &FieldValue::Number(50.0), &ctx));
        let ctx = HandlerContext { arguments: &plain, row_index: 0 };
        assert!(apply_threshold(&mut acc, &FieldValue::Text("20".to_string()), &ctx));
        assert!(!apply_threshold(&mut acc, &FieldValue::Text("n/a".to_string()), &ctx));

        let steps = acc.config.threshold_steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], ThresholdStep::new(50.0, "orange"));
        assert_eq!(steps[1], ThresholdStep::new(20.0, DEFAULT_THRESHOLD_COLOR));
    }

    #[test]
    fn test_scalar_handlers_coerce_or_skip() {
        let args = HandlerArguments::default();
        let ctx = HandlerContext { arguments: &args, row_index: 0 };
        let mut acc = ConfigAccumulator::default();

        assert!(apply_decimals(&mut acc, &FieldValue::Number(2.4), &ctx));
        assert!(!apply_decimals(&mut acc, &FieldValue::Number(-1.0), &ctx));
        assert!(apply_unit(&mut acc, &FieldValue::Text("ms".to_string()), &ctx));
        assert!(apply_color(&mut acc, &FieldValue::Text("blue".to_string()), &ctx));
        assert!(!apply_min(&mut acc, &FieldValue::List(vec![]), &ctx));

        assert_eq!(acc.config.decimals, Some(2));
        assert_eq!(acc.config.unit.as_deref(), Some("ms"));
        assert_eq!(acc.config.color, Some(FieldColor::fixed("blue")));
        assert_eq!(acc.config.min, None);
    }
}

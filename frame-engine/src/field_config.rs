//! FILENAME: frame-engine/src/field_config.rs
//! PURPOSE: Per-field display/formatting configuration.
//! CONTEXT: `FieldConfig` is an open mapping. The recognized keys are typed
//! fields; everything else lands in `custom` and round-trips unchanged.
//! Keys are camelCase on the wire (`displayName`, `noValue`, ...).

use std::collections::BTreeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

// ============================================================================
// FIELD CONFIG
// ============================================================================

/// Display and formatting configuration attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Number of decimals to display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Text shown when the field has no value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<FieldColor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<ThresholdsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mappings: Option<Vec<ValueMapping>>,

    /// Unrecognized keys, passed through untouched.
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

impl FieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no key at all is set.
    pub fn is_empty(&self) -> bool {
        *self == FieldConfig::default()
    }

    /// Threshold steps, or an empty slice when no thresholds are configured.
    pub fn threshold_steps(&self) -> &[ThresholdStep] {
        self.thresholds
            .as_ref()
            .map(|t| t.steps.as_slice())
            .unwrap_or(&[])
    }
}

// ============================================================================
// COLOR
// ============================================================================

/// How a field picks its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FieldColorMode {
    #[serde(rename = "fixed")]
    Fixed,
    #[default]
    #[serde(rename = "thresholds")]
    Thresholds,
    #[serde(rename = "palette-classic")]
    PaletteClassic,
    #[serde(rename = "shades")]
    Shades,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldColor {
    pub mode: FieldColorMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_color: Option<String>,
}

impl FieldColor {
    pub fn fixed(color: impl Into<String>) -> Self {
        FieldColor {
            mode: FieldColorMode::Fixed,
            fixed_color: Some(color.into()),
        }
    }
}

// ============================================================================
// THRESHOLDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ThresholdsMode {
    #[default]
    Absolute,
    Percentage,
}

/// A coloring boundary. The base step uses `-Infinity` as its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdStep {
    #[serde(with = "neg_infinity_as_null")]
    pub value: f64,
    pub color: String,
}

impl ThresholdStep {
    pub fn new(value: f64, color: impl Into<String>) -> Self {
        ThresholdStep {
            value,
            color: color.into(),
        }
    }

    /// The unbounded step every threshold list conventionally starts with.
    pub fn base(color: impl Into<String>) -> Self {
        Self::new(f64::NEG_INFINITY, color)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ThresholdsConfig {
    #[serde(default)]
    pub mode: ThresholdsMode,
    #[serde(default)]
    pub steps: Vec<ThresholdStep>,
}

impl ThresholdsConfig {
    pub fn absolute(steps: Vec<ThresholdStep>) -> Self {
        ThresholdsConfig {
            mode: ThresholdsMode::Absolute,
            steps,
        }
    }
}

/// JSON has no infinity literal; the base step's `-Infinity` travels as `null`.
mod neg_infinity_as_null {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if *value == f64::NEG_INFINITY {
            serializer.serialize_none()
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value: Option<f64> = Option::deserialize(deserializer)?;
        Ok(value.unwrap_or(f64::NEG_INFINITY))
    }
}

// ============================================================================
// VALUE MAPPINGS
// ============================================================================

/// What a matched value is displayed as.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ValueMappingResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Position of this entry; keeps display order stable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeMapOptions {
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub result: ValueMappingResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialValueOptions {
    /// One of `true`, `false`, `null`, `nan`, `null+nan`, `empty`.
    #[serde(rename = "match")]
    pub match_kind: String,
    pub result: ValueMappingResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexMapOptions {
    pub pattern: String,
    pub result: ValueMappingResult,
}

/// A value-mapping definition, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ValueMapping {
    /// Exact value matches, keyed by the value's display string.
    Value {
        options: BTreeMap<String, ValueMappingResult>,
    },
    Range {
        options: RangeMapOptions,
    },
    Special {
        options: SpecialValueOptions,
    },
    Regex {
        options: RegexMapOptions,
    },
}

//! FILENAME: config-engine/src/definition.rs
//! Config-from-query Definition - The serializable options.
//!
//! This module contains the types needed to DESCRIBE one extraction:
//! which frame holds the configuration, how its columns map onto config
//! keys, and which target fields receive the result.
//! These structures are designed to be:
//! - Serializable (saved alongside the pipeline that uses them)
//! - Consumed once per extraction call, never mutated by it

use serde::{Deserialize, Serialize};
use frame_engine::{MatcherConfig, ReducerId};
use crate::error::TransformError;

/// The `configRefId` used when none is given.
pub const DEFAULT_CONFIG_REF_ID: &str = "config";

// ============================================================================
// HANDLER ARGUMENTS
// ============================================================================

/// Extra arguments for threshold handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ThresholdArguments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Parameters for handlers that need more than the bare reduced value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HandlerArguments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<ThresholdArguments>,
}

impl HandlerArguments {
    pub fn threshold_color(color: impl Into<String>) -> Self {
        HandlerArguments {
            threshold: Some(ThresholdArguments {
                color: Some(color.into()),
            }),
        }
    }
}

// ============================================================================
// FIELD MAPPING
// ============================================================================

/// A user-declared mapping from one config-frame column to a config key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldToConfigMapping {
    /// Display name of the config-frame field.
    pub field_name: String,

    /// Config handler key (`max`, `threshold1`, `mappings.text`, `__ignore`, ...).
    pub handler_key: String,

    /// Overrides the handler's default reducer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reducer_id: Option<ReducerId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler_arguments: Option<HandlerArguments>,
}

impl FieldToConfigMapping {
    pub fn new(field_name: impl Into<String>, handler_key: impl Into<String>) -> Self {
        FieldToConfigMapping {
            field_name: field_name.into(),
            handler_key: handler_key.into(),
            reducer_id: None,
            handler_arguments: None,
        }
    }

    pub fn with_reducer(mut self, reducer_id: ReducerId) -> Self {
        self.reducer_id = Some(reducer_id);
        self
    }

    pub fn with_arguments(mut self, arguments: HandlerArguments) -> Self {
        self.handler_arguments = Some(arguments);
        self
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Options for one config-from-query extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFromQueryOptions {
    /// `refId` of the configuration frame. `None` never matches a frame.
    #[serde(default = "default_config_ref_id")]
    pub config_ref_id: Option<String>,

    #[serde(default)]
    pub mappings: Vec<FieldToConfigMapping>,

    /// Target-field selection; numeric fields when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_to: Option<MatcherConfig>,
}

fn default_config_ref_id() -> Option<String> {
    Some(DEFAULT_CONFIG_REF_ID.to_string())
}

impl Default for ConfigFromQueryOptions {
    fn default() -> Self {
        ConfigFromQueryOptions {
            config_ref_id: default_config_ref_id(),
            mappings: Vec::new(),
            apply_to: None,
        }
    }
}

impl ConfigFromQueryOptions {
    pub fn new(config_ref_id: impl Into<String>) -> Self {
        ConfigFromQueryOptions {
            config_ref_id: Some(config_ref_id.into()),
            ..Default::default()
        }
    }

    pub fn with_mapping(mut self, mapping: FieldToConfigMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    pub fn with_apply_to(mut self, matcher: MatcherConfig) -> Self {
        self.apply_to = Some(matcher);
        self
    }

    /// Parses saved options.
    pub fn from_json(json: &str) -> Result<Self, TransformError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, TransformError> {
        Ok(serde_json::to_string(self)?)
    }
}

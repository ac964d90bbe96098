//! FILENAME: frame-engine/src/lib.rs
//! PURPOSE: Main library entry point for the frame data model.
//! CONTEXT: Re-exports the frame/field types and the generic reducer and
//! field-matcher libraries used by the transform crates.

pub mod error;
pub mod field_config;
pub mod frame;
pub mod matcher;
pub mod reducer;
pub mod value;

// Re-export commonly used types at the crate root
pub use error::FrameError;
pub use field_config::{
    FieldColor, FieldColorMode, FieldConfig, RangeMapOptions, RegexMapOptions, SpecialValueOptions,
    ThresholdStep, ThresholdsConfig, ThresholdsMode, ValueMapping, ValueMappingResult,
};
pub use frame::{Field, Frame};
pub use matcher::{get_field_matcher, matcher_id, FieldMatcher, MatcherConfig};
pub use reducer::{reduce_field, reduce_single, FieldReducers, ReducerId};
pub use value::{FieldType, FieldValue};

//! FILENAME: config-engine/src/lib.rs
//! Config-from-query subsystem.
//!
//! Turns one designated frame of a frame set (the "config frame") into field
//! display configuration (min, max, decimals, display name, thresholds, value
//! mappings) and applies it to the matching fields of the other frames.
//!
//! PIPELINE: Options --> Mapping Resolver --> Config Frame Reducer -->
//! Config Projector --> Config Merger (per matched field) --> Frames
//!
//! Layers:
//! - `definition`: Serializable options (what the extraction IS)
//! - `handlers`: Registry of config-key handlers
//! - `mapping`: Field-to-handler/reducer resolution
//! - `reduce` / `projector` / `merge`: The three transformation stages
//! - `engine`: Orchestration over a frame set
//! - `transformer`: Pipeline registration and stream operator

pub mod definition;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod mapping;
pub mod merge;
pub mod projector;
pub mod reduce;
pub mod transformer;


pub use definition::{
    ConfigFromQueryOptions, FieldToConfigMapping, HandlerArguments, ThresholdArguments,
    DEFAULT_CONFIG_REF_ID,
};
pub use engine::{extract_config_from_query, ConfigFramePolicy};
pub use error::TransformError;
pub use handlers::{handler_key, lookup_handler, ConfigHandler, HandlerContext};
pub use mapping::{resolve_field_mappings, MappingResolution, ResolvedMapping};
pub use merge::{merge_config, merge_threshold_steps, merge_thresholds};
pub use projector::{project_field_config, ConfigAccumulator, ValueMappingAccumulator};
pub use reduce::reduce_config_frame;
pub use transformer::{config_from_data_transformer, TransformerInfo, CONFIG_FROM_DATA_ID};

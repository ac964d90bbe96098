//! FILENAME: config-engine/src/error.rs

use frame_engine::FrameError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("Unknown config handler: {0}")]
    UnknownHandler(String),

    #[error("No config mapping for field: {0}")]
    UnmappedField(String),

    /// The resolver must cover every config-frame field; this is a bug, not bad input.
    #[error("Internal error: field '{0}' is missing from the mapping resolution")]
    MissingFieldMapping(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

//! FILENAME: frame-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Unknown reducer: {0}")]
    UnknownReducer(String),

    #[error("Unknown field matcher: {0}")]
    UnknownMatcher(String),

    #[error("Invalid options for matcher '{id}': {reason}")]
    InvalidMatcherOptions { id: String, reason: String },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

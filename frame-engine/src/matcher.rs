//! FILENAME: frame-engine/src/matcher.rs
//! PURPOSE: Field matchers - predicates selecting fields within a frame set.
//! CONTEXT: A `MatcherConfig` (id + options) is compiled once into a
//! `FieldMatcher` closure. Bad ids or options are rejected here, before any
//! frame is walked.
//!
//! Name matchers accept either the raw field name or the display name.
//! Positional matchers (`first`, `firstTimeField`) compare by identity, so the
//! field passed in must be borrowed from the frame passed alongside it.

use log::trace;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::error::FrameError;
use crate::frame::{Field, Frame};
use crate::value::FieldType;

/// Built-in matcher ids.
pub mod matcher_id {
    pub const NUMERIC: &str = "numeric";
    pub const TIME: &str = "time";
    pub const BY_TYPE: &str = "byType";
    pub const BY_NAME: &str = "byName";
    pub const BY_NAMES: &str = "byNames";
    pub const BY_REGEXP: &str = "byRegexp";
    pub const FIRST: &str = "first";
    pub const FIRST_TIME_FIELD: &str = "firstTimeField";
    pub const BY_FRAME_REF_ID: &str = "byFrameRefID";
}

/// Serializable matcher selection: which matcher, with which options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl MatcherConfig {
    pub fn new(id: impl Into<String>) -> Self {
        MatcherConfig {
            id: id.into(),
            options: None,
        }
    }

    pub fn with_options(id: impl Into<String>, options: Value) -> Self {
        MatcherConfig {
            id: id.into(),
            options: Some(options),
        }
    }

    pub fn numeric() -> Self {
        Self::new(matcher_id::NUMERIC)
    }

    pub fn by_name(name: &str) -> Self {
        Self::with_options(matcher_id::BY_NAME, Value::String(name.to_string()))
    }
}

/// Compiled predicate: `(field, its frame, all frames) -> selected?`.
pub type FieldMatcher = Box<dyn Fn(&Field, &Frame, &[Frame]) -> bool + Send + Sync>;

/// Compiles a matcher config into a predicate.
pub fn get_field_matcher(config: &MatcherConfig) -> Result<FieldMatcher, FrameError> {
    let id = config.id.as_str();
    trace!("compiling field matcher '{}'", id);

    let matcher: FieldMatcher = match id {
        matcher_id::NUMERIC => boxed(|field, _, _| field.field_type == FieldType::Number),
        matcher_id::TIME => boxed(|field, _, _| field.field_type == FieldType::Time),
        matcher_id::BY_TYPE => {
            let name = option_str(config)?;
            let wanted = FieldType::from_name(&name)
                .ok_or_else(|| invalid(id, format!("unknown field type '{}'", name)))?;
            boxed(move |field, _, _| field.field_type == wanted)
        }
        matcher_id::BY_NAME => {
            let name = option_str(config)?;
            boxed(move |field, _, _| field.name == name || field.display_name() == name)
        }
        matcher_id::BY_NAMES => {
            let names = option_names(config)?;
            boxed(move |field, _, _| {
                names.iter().any(|n| *n == field.name || n == field.display_name())
            })
        }
        matcher_id::BY_REGEXP => {
            let pattern = option_str(config)?;
            let regex = Regex::new(&pattern)?;
            boxed(move |field, _, _| regex.is_match(field.display_name()))
        }
        matcher_id::FIRST => boxed(|field, frame, _| {
            frame.fields.first().is_some_and(|first| std::ptr::eq(first, field))
        }),
        matcher_id::FIRST_TIME_FIELD => boxed(|field, frame, _| {
            frame
                .fields
                .iter()
                .find(|f| f.field_type == FieldType::Time)
                .is_some_and(|first| std::ptr::eq(first, field))
        }),
        matcher_id::BY_FRAME_REF_ID => {
            let ref_id = option_str(config)?;
            boxed(move |_, frame, _| frame.has_ref_id(&ref_id))
        }
        other => return Err(FrameError::UnknownMatcher(other.to_string())),
    };

    Ok(matcher)
}

fn boxed<F>(f: F) -> FieldMatcher
where
    F: Fn(&Field, &Frame, &[Frame]) -> bool + Send + Sync + 'static,
{
    Box::new(f)
}

fn invalid(id: &str, reason: impl Into<String>) -> FrameError {
    FrameError::InvalidMatcherOptions {
        id: id.to_string(),
        reason: reason.into(),
    }
}

fn option_str(config: &MatcherConfig) -> Result<String, FrameError> {
    match &config.options {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(invalid(&config.id, "expected a string option")),
    }
}

/// Accepts either `["a", "b"]` or `{ "names": ["a", "b"] }`.
fn option_names(config: &MatcherConfig) -> Result<Vec<String>, FrameError> {
    let list = match &config.options {
        Some(Value::Array(items)) => items,
        Some(Value::Object(map)) => match map.get("names") {
            Some(Value::Array(items)) => items,
            _ => return Err(invalid(&config.id, "expected a 'names' list")),
        },
        _ => return Err(invalid(&config.id, "expected a list of names")),
    };

    list.iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid(&config.id, "names must be strings"))
        })
        .collect()
}

//! FILENAME: config-engine/src/mapping.rs
//! PURPOSE: Resolves which config key and reducer every config-frame field uses.
//! CONTEXT: User mappings win; otherwise a field named like a handler key
//! (case-insensitive) gets that handler; otherwise the field is ignored, or
//! rejected when resolving strictly. The result covers every field, so later
//! stages may treat a missing entry as a bug.

use std::collections::HashMap;
use log::trace;
use frame_engine::{Frame, ReducerId};
use crate::definition::{FieldToConfigMapping, HandlerArguments};
use crate::error::TransformError;
use crate::handlers::{handler_key, lookup_handler, lookup_handler_by_field_name, ConfigHandler};

/// Reducer for fields with neither a mapping reducer nor a handler default.
pub const FALLBACK_REDUCER: ReducerId = ReducerId::LastNotNull;

/// How one config-frame field is reduced and where the result goes.
#[derive(Debug, Clone)]
pub struct ResolvedMapping {
    pub reducer_id: ReducerId,
    pub handler_key: String,
    pub handler_arguments: HandlerArguments,
    handler: Option<&'static ConfigHandler>,
}

impl ResolvedMapping {
    fn ignored(reducer_id: ReducerId) -> Self {
        ResolvedMapping {
            reducer_id,
            handler_key: handler_key::IGNORE.to_string(),
            handler_arguments: HandlerArguments::default(),
            handler: None,
        }
    }

    /// The handler to project with; `None` for ignored fields.
    pub fn handler(&self) -> Option<&'static ConfigHandler> {
        self.handler
    }

    pub fn is_ignored(&self) -> bool {
        self.handler.is_none()
    }
}

/// Per-field resolution, keyed by display name.
#[derive(Debug, Clone, Default)]
pub struct MappingResolution {
    pub index: HashMap<String, ResolvedMapping>,
}

impl MappingResolution {
    pub fn get(&self, field_name: &str) -> Option<&ResolvedMapping> {
        self.index.get(field_name)
    }

    /// Like `get`, but a missing entry is an internal-consistency error.
    pub fn require(&self, field_name: &str) -> Result<&ResolvedMapping, TransformError> {
        self.get(field_name)
            .ok_or_else(|| TransformError::MissingFieldMapping(field_name.to_string()))
    }
}

/// Resolves every field of `frame` against `mappings`.
pub fn resolve_field_mappings(
    frame: &Frame,
    mappings: &[FieldToConfigMapping],
    strict: bool,
) -> Result<MappingResolution, TransformError> {
    // Validate every user mapping first, whether or not its field is present.
    let mut checked: Vec<(&FieldToConfigMapping, Option<&'static ConfigHandler>)> =
        Vec::with_capacity(mappings.len());
    for mapping in mappings {
        let handler = if mapping.handler_key == handler_key::IGNORE {
            None
        } else {
            let handler = lookup_handler(&mapping.handler_key)
                .ok_or_else(|| TransformError::UnknownHandler(mapping.handler_key.clone()))?;
            Some(handler)
        };
        checked.push((mapping, handler));
    }

    let mut resolution = MappingResolution::default();

    for field in &frame.fields {
        let name = field.display_name();

        let user = checked.iter().find(|(m, _)| m.field_name == name);
        let resolved = match user {
            Some((mapping, handler)) => ResolvedMapping {
                reducer_id: mapping
                    .reducer_id
                    .or(handler.map(|h| h.default_reducer))
                    .unwrap_or(FALLBACK_REDUCER),
                handler_key: mapping.handler_key.clone(),
                handler_arguments: mapping.handler_arguments.clone().unwrap_or_default(),
                handler: *handler,
            },
            None => match lookup_handler_by_field_name(name) {
                Some((key, handler)) => ResolvedMapping {
                    reducer_id: handler.default_reducer,
                    handler_key: key,
                    handler_arguments: HandlerArguments::default(),
                    handler: Some(handler),
                },
                None if strict => return Err(TransformError::UnmappedField(name.to_string())),
                None => ResolvedMapping::ignored(FALLBACK_REDUCER),
            },
        };

        trace!(
            "config field '{}' -> '{}' via {}",
            name,
            resolved.handler_key,
            resolved.reducer_id
        );
        resolution.index.insert(name.to_string(), resolved);
    }

    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_engine::Field;

    fn config_frame() -> Frame {
        Frame::new(vec![
            Field::time("Time", &[1.0, 2.0, 3.0]),
            Field::number("Max", &[1.0, 10.0, 50.0]),
            Field::number("Min", &[1.0, 10.0, 5.0]),
            Field::text("Names", &["first-name", "middle", "last-name"]),
        ])
        .with_ref_id("A")
    }

    #[test]
    fn test_defaults_by_field_name() {
        let resolution = resolve_field_mappings(&config_frame(), &[], false).unwrap();
        assert_eq!(resolution.index.len(), 4);

        let max = resolution.get("Max").unwrap();
        assert_eq!(max.handler_key, "max");
        assert_eq!(max.reducer_id, ReducerId::Max);

        let min = resolution.get("Min").unwrap();
        assert_eq!(min.reducer_id, ReducerId::Min);

        let names = resolution.get("Names").unwrap();
        assert!(names.is_ignored());
        assert_eq!(names.handler_key, handler_key::IGNORE);
        assert_eq!(names.reducer_id, FALLBACK_REDUCER);
    }

    #[test]
    fn test_user_mapping_overrides_default() {
        let mappings = vec![
            FieldToConfigMapping::new("Min", "decimals"),
            FieldToConfigMapping::new("Max", "max").with_reducer(ReducerId::Min),
            FieldToConfigMapping::new("Names", "displayName").with_reducer(ReducerId::First),
        ];
        let resolution = resolve_field_mappings(&config_frame(), &mappings, false).unwrap();

        let min = resolution.get("Min").unwrap();
        assert_eq!(min.handler_key, "decimals");
        assert_eq!(min.reducer_id, ReducerId::LastNotNull);

        assert_eq!(resolution.get("Max").unwrap().reducer_id, ReducerId::Min);
        assert_eq!(resolution.get("Names").unwrap().reducer_id, ReducerId::First);
    }

    #[test]
    fn test_ignore_keeps_a_reducer() {
        let mappings = vec![FieldToConfigMapping::new("Min", handler_key::IGNORE).with_reducer(ReducerId::Sum)];
        let resolution = resolve_field_mappings(&config_frame(), &mappings, false).unwrap();
        let min = resolution.get("Min").unwrap();
        assert!(min.is_ignored());
        assert_eq!(min.reducer_id, ReducerId::Sum);
    }

    #[test]
    fn test_unknown_handler_key_is_rejected() {
        let mappings = vec![FieldToConfigMapping::new("Absent", "colour")];
        assert!(matches!(
            resolve_field_mappings(&config_frame(), &mappings, false),
            Err(TransformError::UnknownHandler(key)) if key == "colour"
        ));
    }

    #[test]
    fn test_strict_rejects_unmapped_fields() {
        assert!(matches!(
            resolve_field_mappings(&config_frame(), &[], true),
            Err(TransformError::UnmappedField(name)) if name == "Time"
        ));
    }

    #[test]
    fn test_require_reports_consistency_fault() {
        let resolution = MappingResolution::default();
        assert!(matches!(
            resolution.require("Max"),
            Err(TransformError::MissingFieldMapping(name)) if name == "Max"
        ));
    }
}

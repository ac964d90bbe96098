//! FILENAME: config-engine/src/reduce.rs
//! PURPOSE: Reduces the configuration frame to a single row.
//! CONTEXT: Every field is reduced with its resolved reducer, ignored fields
//! included, so the reduced frame keeps the original field set and order.

use frame_engine::{reduce_single, Field, Frame};
use crate::error::TransformError;
use crate::mapping::MappingResolution;

/// Returns a one-row copy of `frame`; the input is left untouched.
pub fn reduce_config_frame(
    frame: &Frame,
    resolution: &MappingResolution,
) -> Result<Frame, TransformError> {
    let fields = frame
        .fields
        .iter()
        .map(|field| -> Result<Field, TransformError> {
            let mapping = resolution.require(field.display_name())?;
            Ok(Field {
                name: field.name.clone(),
                field_type: field.field_type,
                values: vec![reduce_single(field, mapping.reducer_id)],
                config: field.config.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Frame {
        ref_id: frame.ref_id.clone(),
        fields,
        length: 1,
    })
}

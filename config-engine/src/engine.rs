//! FILENAME: config-engine/src/engine.rs
//! Config Engine - Applies a configuration frame to the other frames of a set.
//!
//! Algorithm:
//! 1. Find the first frame whose refId is `configRefId` (none: pass through)
//! 2. Resolve field mappings and reduce the config frame to one row
//! 3. Project the reduced row into a config fragment
//! 4. Compile the target matcher (`applyTo`, numeric fields by default)
//! 5. Rebuild every frame, merging the fragment into each matched field
//!
//! The config frame itself is dropped from the output when other frames are
//! present, and configures its own fields when it is the only frame.

use log::{debug, trace};
use frame_engine::{get_field_matcher, FieldConfig, FieldMatcher, Frame, MatcherConfig};
use crate::definition::ConfigFromQueryOptions;
use crate::error::TransformError;
use crate::mapping::resolve_field_mappings;
use crate::merge::merge_config;
use crate::projector::project_field_config;
use crate::reduce::reduce_config_frame;

/// What happens to the config frame in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFramePolicy {
    /// Other frames exist: the config frame is consumed and not emitted.
    Drop,
    /// It is the only frame: it is kept and configures itself.
    SelfApply,
}

impl ConfigFramePolicy {
    pub fn for_frame_count(count: usize) -> Self {
        if count > 1 {
            ConfigFramePolicy::Drop
        } else {
            ConfigFramePolicy::SelfApply
        }
    }
}

/// Extracts configuration from the config frame and applies it to the
/// matched fields of every frame. Returns `frames` as-is when no frame
/// carries `options.config_ref_id`.
pub fn extract_config_from_query(
    options: &ConfigFromQueryOptions,
    frames: Vec<Frame>,
) -> Result<Vec<Frame>, TransformError> {
    let config_index = options
        .config_ref_id
        .as_deref()
        .and_then(|ref_id| frames.iter().position(|f| f.has_ref_id(ref_id)));

    let Some(config_index) = config_index else {
        debug!(
            "no frame with refId {:?}, passing {} frame(s) through",
            options.config_ref_id,
            frames.len()
        );
        return Ok(frames);
    };

    let config_frame = &frames[config_index];
    debug!(
        "using frame {} as config frame ({} fields, {} rows)",
        config_index,
        config_frame.fields.len(),
        config_frame.length
    );

    let resolution = resolve_field_mappings(config_frame, &options.mappings, false)?;
    let reduced = reduce_config_frame(config_frame, &resolution)?;
    let fragment = project_field_config(&reduced, 0, &resolution)?;

    let matcher_config = options.apply_to.clone().unwrap_or_else(MatcherConfig::numeric);
    let matcher = get_field_matcher(&matcher_config)?;

    let policy = ConfigFramePolicy::for_frame_count(frames.len());

    let output: Vec<Frame> = frames
        .iter()
        .enumerate()
        .filter(|(index, _)| !(*index == config_index && policy == ConfigFramePolicy::Drop))
        .map(|(_, frame)| apply_to_frame(frame, &frames, &matcher, &fragment))
        .collect();

    debug!("config applied, {} frame(s) out", output.len());
    Ok(output)
}

/// Rebuilds `frame`, merging `fragment` into every field the matcher accepts.
fn apply_to_frame(
    frame: &Frame,
    all_frames: &[Frame],
    matcher: &FieldMatcher,
    fragment: &FieldConfig,
) -> Frame {
    let fields = frame
        .fields
        .iter()
        .map(|field| {
            if matcher(field, frame, all_frames) {
                trace!("applying config to field '{}'", field.display_name());
                let mut configured = field.clone();
                configured.config = merge_config(&field.config, fragment);
                configured
            } else {
                field.clone()
            }
        })
        .collect();

    Frame {
        ref_id: frame.ref_id.clone(),
        fields,
        length: frame.length,
    }
}

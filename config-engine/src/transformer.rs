//! FILENAME: config-engine/src/transformer.rs
//! PURPOSE: Registration descriptor for the config-from-query transform.
//! CONTEXT: A host pipeline lists transforms by id/name/description and runs
//! them over a stream of frame-set batches. `operator` maps each batch
//! one-to-one, in arrival order, through the pure transform function.

use std::fmt;
use futures::stream::{Stream, StreamExt};
use frame_engine::Frame;
use crate::definition::ConfigFromQueryOptions;
use crate::engine::extract_config_from_query;
use crate::error::TransformError;

pub const CONFIG_FROM_DATA_ID: &str = "configFromData";

/// Signature shared by all frame-set transforms.
pub type TransformFn<O> = fn(&O, Vec<Frame>) -> Result<Vec<Frame>, TransformError>;

/// Describes a transform for registration in a larger pipeline.
#[derive(Clone)]
pub struct TransformerInfo<O> {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub default_options: O,
    transform: TransformFn<O>,
}

impl<O: fmt::Debug> fmt::Debug for TransformerInfo<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerInfo")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("default_options", &self.default_options)
            .finish()
    }
}

impl<O> TransformerInfo<O> {
    /// Runs the transform on one frame set.
    pub fn apply(&self, options: &O, frames: Vec<Frame>) -> Result<Vec<Frame>, TransformError> {
        (self.transform)(options, frames)
    }

    /// Wraps the transform for a stream of frame-set batches.
    pub fn operator<S>(
        &self,
        options: O,
        source: S,
    ) -> impl Stream<Item = Result<Vec<Frame>, TransformError>>
    where
        S: Stream<Item = Vec<Frame>>,
    {
        let transform = self.transform;
        source.map(move |frames| transform(&options, frames))
    }
}

/// The "Config from query results" transform.
pub fn config_from_data_transformer() -> TransformerInfo<ConfigFromQueryOptions> {
    TransformerInfo {
        id: CONFIG_FROM_DATA_ID,
        name: "Config from query results",
        description: "Set unit, min, max and more.",
        default_options: ConfigFromQueryOptions::default(),
        transform: extract_config_from_query,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::stream;
    use frame_engine::Field;

    fn batch(config_max: f64) -> Vec<Frame> {
        vec![
            Frame::new(vec![Field::number("Max", &[config_max])]).with_ref_id("config"),
            Frame::new(vec![Field::number("Value", &[1.0])]),
        ]
    }

    #[test]
    fn test_descriptor() {
        let info = config_from_data_transformer();
        assert_eq!(info.id, "configFromData");
        assert_eq!(info.name, "Config from query results");
        assert_eq!(info.default_options.config_ref_id.as_deref(), Some("config"));
        assert!(info.default_options.mappings.is_empty());
    }

    #[test]
    fn test_apply_uses_default_options() {
        let info = config_from_data_transformer();
        let output = info.apply(&info.default_options, batch(7.0)).unwrap();
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].fields[0].config.max, Some(7.0));
    }

    #[test]
    fn test_operator_maps_batches_in_order() {
        let info = config_from_data_transformer();
        let source = stream::iter(vec![batch(1.0), Vec::new(), batch(3.0)]);

        let results: Vec<_> = block_on(
            info.operator(info.default_options.clone(), source)
                .collect::<Vec<_>>(),
        );

        assert_eq!(results.len(), 3);
        let maxima: Vec<Option<f64>> = results
            .into_iter()
            .map(|r| r.unwrap().first().and_then(|f| f.fields[0].config.max))
            .collect();
        assert_eq!(maxima, vec![Some(1.0), None, Some(3.0)]);
    }
}

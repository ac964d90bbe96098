//! FILENAME: config-engine/src/merge.rs
//! PURPOSE: Merges a projected config fragment into a field's existing config.
//! CONTEXT: Every key is last-write-wins (source over target) except the
//! threshold steps, which are combined:
//! 1. Concatenate target steps then source steps
//! 2. Stable-sort by value
//! 3. Collapse equal values, keeping the one sorted last (the later write)
//!
//! The result is strictly ascending with unique values for any input,
//! so applying the transform repeatedly layers thresholds instead of
//! replacing them.

use frame_engine::{FieldConfig, ThresholdStep, ThresholdsConfig};

/// Overlays `source` onto a copy of `target`.
pub fn merge_config(target: &FieldConfig, source: &FieldConfig) -> FieldConfig {
    let mut result = target.clone();

    overlay(&mut result.display_name, &source.display_name);
    overlay(&mut result.min, &source.min);
    overlay(&mut result.max, &source.max);
    overlay(&mut result.decimals, &source.decimals);
    overlay(&mut result.unit, &source.unit);
    overlay(&mut result.no_value, &source.no_value);
    overlay(&mut result.color, &source.color);
    overlay(&mut result.mappings, &source.mappings);

    for (key, value) in &source.custom {
        result.custom.insert(key.clone(), value.clone());
    }

    result.thresholds = merge_thresholds(target.thresholds.as_ref(), source.thresholds.as_ref());
    result
}

fn overlay<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
    if source.is_some() {
        target.clone_from(source);
    }
}

/// Combines two threshold configs. Absent on both sides stays absent; the
/// mode follows the source when it has one.
pub fn merge_thresholds(
    target: Option<&ThresholdsConfig>,
    source: Option<&ThresholdsConfig>,
) -> Option<ThresholdsConfig> {
    let mode = source.or(target)?.mode;

    let steps = target
        .into_iter()
        .chain(source)
        .flat_map(|t| t.steps.iter().cloned())
        .collect();

    Some(ThresholdsConfig {
        mode,
        steps: merge_threshold_steps(steps),
    })
}

/// Sorts ascending and drops all but the last of each run of equal values.
pub fn merge_threshold_steps(mut steps: Vec<ThresholdStep>) -> Vec<ThresholdStep> {
    // Signed zero folds to +0.0 so -0.0 and 0.0 sort as one value.
    let key = |v: f64| v + 0.0;

    // Stable: among equal values, earlier-written steps stay first.
    steps.sort_by(|a, b| key(a.value).total_cmp(&key(b.value)));

    let mut merged: Vec<ThresholdStep> = Vec::with_capacity(steps.len());
    for step in steps {
        match merged.last_mut() {
            Some(last) if same_value(last.value, step.value) => *last = step,
            _ => merged.push(step),
        }
    }
    merged
}

fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use frame_engine::{FieldColor, ThresholdsMode, ValueMapping};
    use serde_json::json;

    fn step(value: f64, color: &str) -> ThresholdStep {
        ThresholdStep::new(value, color)
    }

    fn with_steps(steps: Vec<ThresholdStep>) -> FieldConfig {
        FieldConfig {
            thresholds: Some(ThresholdsConfig::absolute(steps)),
            ..Default::default()
        }
    }

    fn values(config: &FieldConfig) -> Vec<f64> {
        config.threshold_steps().iter().map(|s| s.value).collect()
    }

    fn colors(config: &FieldConfig) -> Vec<&str> {
        config.threshold_steps().iter().map(|s| s.color.as_str()).collect()
    }

    #[test]
    fn test_source_wins_on_scalar_keys() {
        let target = FieldConfig {
            display_name: Some("SeriesA".to_string()),
            min: Some(0.0),
            max: Some(10.0),
            ..Default::default()
        };
        let source = FieldConfig {
            max: Some(50.0),
            color: Some(FieldColor::fixed("red")),
            ..Default::default()
        };

        let merged = merge_config(&target, &source);
        assert_eq!(merged.display_name.as_deref(), Some("SeriesA"));
        assert_eq!(merged.min, Some(0.0));
        assert_eq!(merged.max, Some(50.0));
        assert_eq!(merged.color, Some(FieldColor::fixed("red")));
        assert!(merged.thresholds.is_none());
    }

    #[test]
    fn test_custom_keys_overlay_shallowly() {
        let mut target = FieldConfig::default();
        target.custom.insert("custom".to_string(), json!({ "lineWidth": 1, "fill": 10 }));
        target.custom.insert("links".to_string(), json!([]));
        let mut source = FieldConfig::default();
        source.custom.insert("custom".to_string(), json!({ "lineWidth": 3 }));

        let merged = merge_config(&target, &source);
        assert_eq!(merged.custom["custom"], json!({ "lineWidth": 3 }));
        assert_eq!(merged.custom["links"], json!([]));
    }

    #[test]
    fn test_mappings_are_replaced_not_merged() {
        let mut options = BTreeMap::new();
        options.insert("1".to_string(), Default::default());
        let target = FieldConfig {
            mappings: Some(vec![ValueMapping::Value { options }]),
            ..Default::default()
        };
        let source = FieldConfig {
            mappings: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(merge_config(&target, &source).mappings, Some(vec![]));
        assert_eq!(merge_config(&target, &FieldConfig::default()).mappings, target.mappings);
    }

    #[test]
    fn test_steps_are_combined_and_sorted() {
        let target = with_steps(vec![ThresholdStep::base("green"), step(80.0, "red")]);
        let source = with_steps(vec![step(50.0, "yellow")]);

        let merged = merge_config(&target, &source);
        assert_eq!(values(&merged), vec![f64::NEG_INFINITY, 50.0, 80.0]);
        assert_eq!(colors(&merged), vec!["green", "yellow", "red"]);
    }

    #[test]
    fn test_equal_values_keep_source() {
        let target = with_steps(vec![ThresholdStep::base("green"), step(50.0, "yellow")]);
        let source = with_steps(vec![step(50.0, "orange")]);

        let merged = merge_config(&target, &source);
        assert_eq!(values(&merged), vec![f64::NEG_INFINITY, 50.0]);
        assert_eq!(colors(&merged), vec!["green", "orange"]);
    }

    #[test]
    fn test_one_sided_thresholds() {
        let only_target = merge_config(&with_steps(vec![step(10.0, "a"), step(5.0, "b")]), &FieldConfig::default());
        assert_eq!(values(&only_target), vec![5.0, 10.0]);

        let only_source = merge_config(&FieldConfig::default(), &with_steps(vec![step(50.0, "orange")]));
        assert_eq!(only_source.threshold_steps(), &[step(50.0, "orange")]);

        let neither = merge_config(&FieldConfig::default(), &FieldConfig::default());
        assert!(neither.thresholds.is_none());
    }

    #[test]
    fn test_empty_step_lists() {
        let merged = merge_config(&with_steps(vec![]), &with_steps(vec![]));
        assert_eq!(merged.thresholds, Some(ThresholdsConfig::absolute(vec![])));
    }

    #[test]
    fn test_mode_follows_source() {
        let target = with_steps(vec![]);
        let source = FieldConfig {
            thresholds: Some(ThresholdsConfig {
                mode: ThresholdsMode::Percentage,
                steps: vec![],
            }),
            ..Default::default()
        };
        assert_eq!(
            merge_config(&target, &source).thresholds.unwrap().mode,
            ThresholdsMode::Percentage
        );
        assert_eq!(
            merge_config(&source, &FieldConfig::default()).thresholds.unwrap().mode,
            ThresholdsMode::Percentage
        );
    }

    #[test]
    fn test_duplicate_laden_unsorted_input() {
        let steps = vec![
            step(30.0, "a"),
            step(10.0, "b"),
            step(30.0, "c"),
            step(f64::NEG_INFINITY, "d"),
            step(10.0, "e"),
            step(20.0, "f"),
            step(30.0, "g"),
        ];
        let merged = merge_threshold_steps(steps);
        let values: Vec<f64> = merged.iter().map(|s| s.value).collect();
        let colors: Vec<&str> = merged.iter().map(|s| s.color.as_str()).collect();
        assert_eq!(values, vec![f64::NEG_INFINITY, 10.0, 20.0, 30.0]);
        assert_eq!(colors, vec!["d", "e", "f", "g"]);
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_signed_zero_follows_write_order() {
        let merged = merge_config(&with_steps(vec![step(0.0, "old")]), &with_steps(vec![step(-0.0, "new")]));
        assert_eq!(colors(&merged), vec!["new"]);

        let merged = merge_config(&with_steps(vec![step(-0.0, "old")]), &with_steps(vec![step(0.0, "new")]));
        assert_eq!(colors(&merged), vec!["new"]);

        let merged = merge_threshold_steps(vec![step(0.0, "a"), step(-1.0, "b"), step(-0.0, "c"), step(1.0, "d")]);
        let colors: Vec<&str> = merged.iter().map(|s| s.color.as_str()).collect();
        assert_eq!(colors, vec!["b", "c", "d"]);
    }
}

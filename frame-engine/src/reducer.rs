//! FILENAME: frame-engine/src/reducer.rs
//! PURPOSE: Reduces a whole column to a single value (min, max, last, ...).
//! CONTEXT: Numeric statistics share one single-pass accumulator; positional
//! and set-like reducers walk the raw values. Non-numeric values never make a
//! numeric reducer fail, they are simply not counted.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::FrameError;
use crate::frame::Field;
use crate::value::FieldValue;

// ============================================================================
// REDUCER IDS
// ============================================================================

/// Identifies a column reducer. Serialized as its camelCase id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReducerId {
    Sum,
    Max,
    Min,
    Mean,
    Count,
    First,
    Last,
    FirstNotNull,
    LastNotNull,
    Range,
    Diff,
    Delta,
    DistinctCount,
    ChangeCount,
    AllIsNull,
    AllIsZero,
    AllValues,
    UniqueValues,
    Median,
    Variance,
    StdDev,
}

impl ReducerId {
    pub const ALL: [ReducerId; 21] = [
        ReducerId::Sum,
        ReducerId::Max,
        ReducerId::Min,
        ReducerId::Mean,
        ReducerId::Count,
        ReducerId::First,
        ReducerId::Last,
        ReducerId::FirstNotNull,
        ReducerId::LastNotNull,
        ReducerId::Range,
        ReducerId::Diff,
        ReducerId::Delta,
        ReducerId::DistinctCount,
        ReducerId::ChangeCount,
        ReducerId::AllIsNull,
        ReducerId::AllIsZero,
        ReducerId::AllValues,
        ReducerId::UniqueValues,
        ReducerId::Median,
        ReducerId::Variance,
        ReducerId::StdDev,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReducerId::Sum => "sum",
            ReducerId::Max => "max",
            ReducerId::Min => "min",
            ReducerId::Mean => "mean",
            ReducerId::Count => "count",
            ReducerId::First => "first",
            ReducerId::Last => "last",
            ReducerId::FirstNotNull => "firstNotNull",
            ReducerId::LastNotNull => "lastNotNull",
            ReducerId::Range => "range",
            ReducerId::Diff => "diff",
            ReducerId::Delta => "delta",
            ReducerId::DistinctCount => "distinctCount",
            ReducerId::ChangeCount => "changeCount",
            ReducerId::AllIsNull => "allIsNull",
            ReducerId::AllIsZero => "allIsZero",
            ReducerId::AllValues => "allValues",
            ReducerId::UniqueValues => "uniqueValues",
            ReducerId::Median => "median",
            ReducerId::Variance => "variance",
            ReducerId::StdDev => "stdDev",
        }
    }

    /// Reducers whose result is a `List` rather than a scalar.
    pub fn is_list(&self) -> bool {
        matches!(self, ReducerId::AllValues | ReducerId::UniqueValues)
    }
}

impl fmt::Display for ReducerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReducerId {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReducerId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| FrameError::UnknownReducer(s.to_string()))
    }
}

// ============================================================================
// NUMERIC ACCUMULATOR
// ============================================================================

/// Single-pass accumulator over the numeric values of a column.
#[derive(Debug, Clone, Default)]
struct NumericAccumulator {
    sum: f64,
    count: u64,
    min: Option<f64>,
    max: Option<f64>,
    first: Option<f64>,
    last: Option<f64>,
    /// Sum of squared differences from the mean (Welford's algorithm).
    m2: f64,
    mean: f64,
    /// Counter-style increase; a drop is treated as a reset.
    delta: f64,
}

impl NumericAccumulator {
    fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;

        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));

        if let Some(previous) = self.last {
            if value < previous {
                self.delta += value;
            } else {
                self.delta += value - previous;
            }
        }
        if self.first.is_none() {
            self.first = Some(value);
        }
        self.last = Some(value);

        let d = value - self.mean;
        self.mean += d / (self.count as f64);
        let d2 = value - self.mean;
        self.m2 += d * d2;
    }

    fn when_any(&self, value: f64) -> FieldValue {
        if self.count > 0 {
            FieldValue::Number(value)
        } else {
            FieldValue::Null
        }
    }

    fn variance(&self) -> FieldValue {
        self.when_any(self.m2 / (self.count.max(1) as f64))
    }
}

// ============================================================================
// REDUCTION
// ============================================================================

/// Result of reducing one field: reducer id to reduced value.
pub type FieldReducers = HashMap<ReducerId, FieldValue>;

/// Reduces `field` with every reducer in `reducers`.
pub fn reduce_field(field: &Field, reducers: &[ReducerId]) -> FieldReducers {
    let values = &field.values;

    let mut acc = NumericAccumulator::default();
    if reducers.iter().any(needs_accumulator) {
        for n in values.iter().filter_map(FieldValue::number) {
            acc.add(n);
        }
    }

    reducers
        .iter()
        .map(|id| (*id, reduce_one(*id, values, &acc)))
        .collect()
}

/// Convenience for the common single-reducer case.
pub fn reduce_single(field: &Field, reducer: ReducerId) -> FieldValue {
    reduce_field(field, &[reducer])
        .remove(&reducer)
        .unwrap_or_default()
}

fn needs_accumulator(id: &ReducerId) -> bool {
    matches!(
        id,
        ReducerId::Sum
            | ReducerId::Max
            | ReducerId::Min
            | ReducerId::Mean
            | ReducerId::Range
            | ReducerId::Diff
            | ReducerId::Delta
            | ReducerId::Variance
            | ReducerId::StdDev
    )
}

fn reduce_one(id: ReducerId, values: &[FieldValue], acc: &NumericAccumulator) -> FieldValue {
    match id {
        ReducerId::Sum => acc.when_any(acc.sum),
        ReducerId::Max => acc.max.into(),
        ReducerId::Min => acc.min.into(),
        ReducerId::Mean => acc.when_any(acc.mean),
        ReducerId::Range => match (acc.min, acc.max) {
            (Some(min), Some(max)) => FieldValue::Number(max - min),
            _ => FieldValue::Null,
        },
        ReducerId::Diff => match (acc.first, acc.last) {
            (Some(first), Some(last)) => FieldValue::Number(last - first),
            _ => FieldValue::Null,
        },
        ReducerId::Delta => acc.when_any(acc.delta),
        ReducerId::Variance => acc.variance(),
        ReducerId::StdDev => match acc.variance() {
            FieldValue::Number(v) => FieldValue::Number(v.sqrt()),
            other => other,
        },
        ReducerId::Median => median(values),
        ReducerId::Count => FieldValue::Number(values.len() as f64),
        ReducerId::First => values.first().cloned().unwrap_or_default(),
        ReducerId::Last => values.last().cloned().unwrap_or_default(),
        ReducerId::FirstNotNull => values.iter().find(|v| !v.is_null()).cloned().unwrap_or_default(),
        ReducerId::LastNotNull => values
            .iter()
            .rev()
            .find(|v| !v.is_null())
            .cloned()
            .unwrap_or_default(),
        ReducerId::DistinctCount => FieldValue::Number(unique_values(values).len() as f64),
        ReducerId::ChangeCount => FieldValue::Number(change_count(values) as f64),
        ReducerId::AllIsNull => FieldValue::Boolean(values.iter().all(FieldValue::is_null)),
        ReducerId::AllIsZero => {
            let mut non_null = values.iter().filter(|v| !v.is_null()).peekable();
            let any = non_null.peek().is_some();
            FieldValue::Boolean(any && non_null.all(|v| v.number() == Some(0.0)))
        }
        ReducerId::AllValues => FieldValue::List(values.to_vec()),
        ReducerId::UniqueValues => FieldValue::List(unique_values(values)),
    }
}

/// Distinct non-null values in first-seen order.
fn unique_values(values: &[FieldValue]) -> Vec<FieldValue> {
    let mut unique: Vec<FieldValue> = Vec::new();
    for value in values.iter().filter(|v| !v.is_null()) {
        if !unique.contains(value) {
            unique.push(value.clone());
        }
    }
    unique
}

fn change_count(values: &[FieldValue]) -> usize {
    let mut previous: Option<&FieldValue> = None;
    let mut changes = 0;
    for value in values.iter().filter(|v| !v.is_null()) {
        if let Some(prev) = previous {
            if prev != value {
                changes += 1;
            }
        }
        previous = Some(value);
    }
    changes
}

fn median(values: &[FieldValue]) -> FieldValue {
    let mut numbers: Vec<f64> = values
        .iter()
        .filter_map(FieldValue::number)
        .filter(|n| !n.is_nan())
        .collect();
    if numbers.is_empty() {
        return FieldValue::Null;
    }
    numbers.sort_by(f64::total_cmp);
    let mid = numbers.len() / 2;
    if numbers.len() % 2 == 0 {
        FieldValue::Number((numbers[mid - 1] + numbers[mid]) / 2.0)
    } else {
        FieldValue::Number(numbers[mid])
    }
}

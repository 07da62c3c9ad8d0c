//! Value-based partitioning of a [`crate::dataset::Dataset`].
//!
//! Every split is a single stable pass: rows keep their relative order in whichever side they
//! land, and both sides carry the source's mode and column declarations.

use crate::dataset::Dataset;
use crate::error::{DatasetError, DatasetResult};
use crate::types::{DataType, Record};

/// Partition rows into `left` (value `<= threshold`) and `right` (value `> threshold`).
///
/// `column` must be declared [`DataType::Integer`] or [`DataType::Real`].
pub fn split_by_numeric(dataset: &Dataset, column: usize, threshold: f64) -> DatasetResult<(Dataset, Dataset)> {
    let data_type = dataset.column_type(column)?;
    if !data_type.is_numeric() {
        return Err(DatasetError::UnsupportedColumnType {
            operation: "split_by_numeric",
            column,
            data_type,
        });
    }
    partition(dataset, column, |r| at_most(r, threshold))
}

/// `record <= threshold`. Integers compare against `floor(threshold)` in `i64` so large values
/// keep full precision; NaN never compares.
fn at_most(record: &Record, threshold: f64) -> bool {
    match record {
        Record::Integer(v) => {
            let t = threshold.floor();
            if t.is_nan() || t < i64::MIN as f64 {
                false
            } else {
                // Saturates at i64::MAX for thresholds past the integer range.
                *v <= t as i64
            }
        }
        other => other.as_f64().is_some_and(|v| v <= threshold),
    }
}

/// Partition rows into `left` (value is one of `values`, compared as strings) and `right`.
pub fn split_by_categorical<S: AsRef<str>>(
    dataset: &Dataset,
    column: usize,
    values: &[S],
) -> DatasetResult<(Dataset, Dataset)> {
    dataset.column_type(column)?;
    partition(dataset, column, |r| {
        let key = r.to_string();
        values.iter().any(|v| v.as_ref() == key)
    })
}

/// Split by a single value: numeric columns by threshold, string columns by equality.
pub fn split_by_value(dataset: &Dataset, column: usize, value: &Record) -> DatasetResult<(Dataset, Dataset)> {
    match (dataset.column_type(column)?, value) {
        (DataType::Integer, &Record::Integer(threshold)) => {
            partition(dataset, column, |r| matches!(r, Record::Integer(v) if *v <= threshold))
        }
        (DataType::Integer | DataType::Real, _) => {
            let threshold = value.as_f64().ok_or(DatasetError::UnsupportedColumnType {
                operation: "split_by_value",
                column,
                data_type: value.data_type(),
            })?;
            split_by_numeric(dataset, column, threshold)
        }
        (DataType::String, _) => split_by_categorical(dataset, column, &[value.to_string()]),
    }
}

fn partition<F>(dataset: &Dataset, column: usize, mut goes_left: F) -> DatasetResult<(Dataset, Dataset)>
where
    F: FnMut(&Record) -> bool,
{
    let mut left = dataset.empty_like();
    let mut right = dataset.empty_like();
    for i in 0..dataset.n_rows() {
        let Some(row) = dataset.row_at(i) else { break };
        if goes_left(&row[column]) {
            left.push_row(row)?;
        } else {
            right.push_row(row)?;
        }
    }
    Ok((left, right))
}

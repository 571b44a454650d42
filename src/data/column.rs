//! Column helpers shared by cleaning, summaries and charts.

use polars::prelude::*;
use std::collections::HashMap;
use std::fmt;

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn of(dtype: &DataType) -> Self {
        if matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        ) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Get list of numeric column names, in table order.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| ColumnKind::of(col.dtype()) == ColumnKind::Numeric)
        .map(|col| col.name().to_string())
        .collect()
}

/// Column values as floats, `None` where missing.
pub fn float_values(column: &Column) -> PolarsResult<Vec<Option<f64>>> {
    let values = column.cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().collect())
}

/// Present (non-missing, non-NaN) values of a numeric column.
pub fn present_values(column: &Column) -> PolarsResult<Vec<f64>> {
    Ok(float_values(column)?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect())
}

/// Column values rendered as text, `None` where missing.
pub fn text_values(column: &Column) -> PolarsResult<Vec<Option<String>>> {
    let values = column.cast(&DataType::String)?;
    Ok(values
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Most frequent value and its count.
///
/// Ties go to the value seen first in iteration order.
pub fn mode<I, S>(values: I) -> Option<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, value) in values.into_iter().enumerate() {
        counts
            .entry(value.as_ref().to_string())
            .or_insert((0, position))
            .0 += 1;
    }

    counts
        .into_iter()
        .min_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_b.cmp(count_a).then(first_a.cmp(first_b))
        })
        .map(|(value, (count, _))| (value, count))
}

/// Human label for an outcome value, so `1.0` and `1` both read as `1`.
pub fn outcome_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

//! Chart Data Module
//! Extracts the series each chart needs from the working table.

use crate::data::column::{self, outcome_label};
use crate::stats::{CorrelationMatrix, StatsCalculator};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Column '{0}' is not in the dataset")]
    MissingColumn(String),
    #[error("No numeric columns to correlate")]
    NoNumericColumns,
    #[error("No values to plot")]
    Empty,
    #[error("Chart data error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to render chart: {0}")]
    Render(String),
    #[error("Failed to prepare chart directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Values of one outcome group.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeGroup<T> {
    pub label: String,
    pub values: Vec<T>,
}

pub struct ChartDataset;

impl ChartDataset {
    fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ChartError> {
        df.column(name)
            .map_err(|_| ChartError::MissingColumn(name.to_string()))
    }

    /// Outcome counts, most frequent first; ties keep first-seen order.
    pub fn outcome_shares(
        df: &DataFrame,
        outcome: &str,
    ) -> Result<Vec<(String, usize)>, ChartError> {
        let labels = column::text_values(Self::column(df, outcome)?)?;

        let mut shares: Vec<(String, usize)> = Vec::new();
        for label in labels.into_iter().flatten() {
            match shares.iter_mut().find(|(l, _)| *l == label) {
                Some((_, count)) => *count += 1,
                None => shares.push((label, 1)),
            }
        }
        if shares.is_empty() {
            return Err(ChartError::Empty);
        }

        // Stable sort keeps first-seen order among equal counts.
        shares.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(shares)
    }

    /// Correlation matrix over every numeric column.
    pub fn correlation(df: &DataFrame) -> Result<CorrelationMatrix, ChartError> {
        let numeric = column::numeric_columns(df);
        if numeric.is_empty() {
            return Err(ChartError::NoNumericColumns);
        }

        let columns = numeric
            .into_iter()
            .map(|name| {
                let values = column::float_values(Self::column(df, &name)?)?;
                Ok((name, values))
            })
            .collect::<Result<Vec<_>, ChartError>>()?;

        Ok(StatsCalculator::correlation_matrix(&columns))
    }

    /// Present values of `value` split by outcome, groups in ascending outcome order.
    pub fn values_by_outcome(
        df: &DataFrame,
        value: &str,
        outcome: &str,
    ) -> Result<Vec<OutcomeGroup<f64>>, ChartError> {
        let values = column::float_values(Self::column(df, value)?)?;
        let outcomes = column::float_values(Self::column(df, outcome)?)?;

        let rows = values.into_iter().zip(outcomes).filter_map(|(v, o)| match (v, o) {
            (Some(v), Some(o)) if !v.is_nan() && !o.is_nan() => Some((o, v)),
            _ => None,
        });
        Self::group(rows)
    }

    /// `(x, y)` pairs split by outcome, groups in ascending outcome order.
    pub fn points_by_outcome(
        df: &DataFrame,
        x: &str,
        y: &str,
        outcome: &str,
    ) -> Result<Vec<OutcomeGroup<(f64, f64)>>, ChartError> {
        let xs = column::float_values(Self::column(df, x)?)?;
        let ys = column::float_values(Self::column(df, y)?)?;
        let outcomes = column::float_values(Self::column(df, outcome)?)?;

        let rows = xs
            .into_iter()
            .zip(ys)
            .zip(outcomes)
            .filter_map(|((x, y), o)| match (x, y, o) {
                (Some(x), Some(y), Some(o)) if !x.is_nan() && !y.is_nan() && !o.is_nan() => {
                    Some((o, (x, y)))
                }
                _ => None,
            });
        Self::group(rows)
    }

    /// Rows keep their table order inside each group. Outcomes are NaN-free.
    fn group<T>(
        rows: impl Iterator<Item = (f64, T)>,
    ) -> Result<Vec<OutcomeGroup<T>>, ChartError> {
        let mut groups: Vec<(f64, Vec<T>)> = Vec::new();
        for (outcome, value) in rows {
            match groups.iter_mut().find(|(o, _)| *o == outcome) {
                Some((_, values)) => values.push(value),
                None => groups.push((outcome, vec![value])),
            }
        }
        if groups.is_empty() {
            return Err(ChartError::Empty);
        }

        groups.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(groups
            .into_iter()
            .map(|(outcome, values)| OutcomeGroup {
                label: outcome_label(outcome),
                values,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patients() -> DataFrame {
        df!(
            "Age" => [Some(30.0), Some(70.0), Some(50.0), None, Some(80.0)],
            "BMI" => [22.0, 31.0, 27.0, 25.0, 29.0],
            "Average_Glucose_Level" => [90.0, 200.0, 110.0, 100.0, 180.0],
            "Stroke" => [0i64, 1, 0, 0, 1],
            "Sex" => ["F", "M", "F", "M", "F"],
        )
        .unwrap()
    }

    #[test]
    fn test_outcome_shares_by_frequency() {
        let shares = ChartDataset::outcome_shares(&patients(), "Stroke").unwrap();
        assert_eq!(shares, vec![("0".to_string(), 3), ("1".to_string(), 2)]);
    }

    #[test]
    fn test_missing_outcome_column() {
        assert!(matches!(
            ChartDataset::outcome_shares(&patients(), "Outcome"),
            Err(ChartError::MissingColumn(c)) if c == "Outcome"
        ));
    }

    #[test]
    fn test_correlation_covers_numeric_columns_only() {
        let matrix = ChartDataset::correlation(&patients()).unwrap();
        assert_eq!(
            matrix.columns,
            vec!["Age", "BMI", "Average_Glucose_Level", "Stroke"]
        );
        assert!((matrix.get(1, 1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_correlation_without_numeric_columns() {
        let df = df!("Sex" => ["F", "M"]).unwrap();
        assert!(matches!(
            ChartDataset::correlation(&df),
            Err(ChartError::NoNumericColumns)
        ));
    }

    #[test]
    fn test_values_grouped_by_outcome() {
        let groups = ChartDataset::values_by_outcome(&patients(), "Age", "Stroke").unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "0");
        assert_eq!(groups[0].values, vec![30.0, 50.0]);
        assert_eq!(groups[1].label, "1");
        assert_eq!(groups[1].values, vec![70.0, 80.0]);
    }

    #[test]
    fn test_points_grouped_by_outcome() {
        let groups =
            ChartDataset::points_by_outcome(&patients(), "BMI", "Average_Glucose_Level", "Stroke")
                .unwrap();

        assert_eq!(groups[0].values, vec![(22.0, 90.0), (27.0, 110.0), (25.0, 100.0)]);
        assert_eq!(groups[1].values, vec![(31.0, 200.0), (29.0, 180.0)]);
    }

    #[test]
    fn test_groups_sorted_by_outcome_value() {
        let df = df!(
            "Age" => [1.0, 2.0, 3.0, 4.0, 5.0],
            "Grade" => [2.0, -1.0, 0.5, 2.0, -1.0],
        )
        .unwrap();

        let groups = ChartDataset::values_by_outcome(&df, "Age", "Grade").unwrap();
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["-1", "0.5", "2"]);
        assert_eq!(groups[0].values, vec![2.0, 5.0]);
        assert_eq!(groups[2].values, vec![1.0, 4.0]);
    }

    #[test]
    fn test_no_complete_rows_is_empty() {
        let df = df!(
            "Age" => [None::<f64>, None],
            "Stroke" => [0i64, 1],
        )
        .unwrap();

        assert!(matches!(
            ChartDataset::values_by_outcome(&df, "Age", "Stroke"),
            Err(ChartError::Empty)
        ));
    }
}

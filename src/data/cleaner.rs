//! Data Cleaner Module
//! Removes exact duplicate records and imputes missing values in place.

use crate::data::{column, ColumnKind};
use polars::prelude::*;
use std::fmt;

/// Value used to fill a column's missing entries.
#[derive(Debug, Clone, PartialEq)]
pub enum FillValue {
    Mean(f64),
    Mode(String),
    /// Every value was missing, nothing to derive a fill from.
    Unavailable,
}

impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillValue::Mean(v) => write!(f, "mean {:.3}", v),
            FillValue::Mode(v) => write!(f, "mode '{}'", v),
            FillValue::Unavailable => write!(f, "left empty (no values present)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImputedColumn {
    pub name: String,
    pub missing: usize,
    pub fill: FillValue,
}

/// Outcome of one cleaning pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CleanReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns: usize,
    pub duplicates_removed: usize,
    /// Records that only became identical once their gaps were filled.
    pub duplicates_after_imputation: usize,
    pub imputed: Vec<ImputedColumn>,
}

impl CleanReport {
    /// Columns whose gaps were actually filled.
    pub fn filled(&self) -> impl Iterator<Item = &ImputedColumn> {
        self.imputed
            .iter()
            .filter(|c| c.fill != FillValue::Unavailable)
    }

    /// Columns left with gaps because they hold no values at all.
    pub fn unfillable(&self) -> impl Iterator<Item = &ImputedColumn> {
        self.imputed
            .iter()
            .filter(|c| c.fill == FillValue::Unavailable)
    }

    /// True when the pass changed nothing.
    pub fn is_noop(&self) -> bool {
        self.duplicates_removed == 0
            && self.duplicates_after_imputation == 0
            && self.filled().next().is_none()
    }
}

pub struct DataCleaner;

impl DataCleaner {
    /// Drop duplicates (keeping first occurrences), then fill gaps with the
    /// column mean or mode.
    pub fn clean(df: &mut DataFrame) -> PolarsResult<CleanReport> {
        let rows_before = df.height();

        let deduped = Self::drop_duplicates(df)?;
        let duplicates_removed = rows_before - deduped.height();

        let (imputed_df, imputed) = Self::impute(deduped)?;
        let any_filled = imputed.iter().any(|c| c.fill != FillValue::Unavailable);

        // Filling can make formerly distinct records equal.
        let (final_df, duplicates_after_imputation) = if !any_filled {
            (imputed_df, 0)
        } else {
            let before = imputed_df.height();
            let final_df = Self::drop_duplicates(&imputed_df)?;
            let removed = before - final_df.height();
            (final_df, removed)
        };

        let report = CleanReport {
            rows_before,
            rows_after: final_df.height(),
            columns: final_df.width(),
            duplicates_removed,
            duplicates_after_imputation,
            imputed,
        };
        log::info!(
            "cleaned table: {} -> {} rows, {} columns imputed",
            report.rows_before,
            report.rows_after,
            report.imputed.len()
        );

        *df = final_df;
        Ok(report)
    }

    fn drop_duplicates(df: &DataFrame) -> PolarsResult<DataFrame> {
        df.clone()
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()
    }

    /// Fill values are computed from the present values before any filling.
    fn impute(df: DataFrame) -> PolarsResult<(DataFrame, Vec<ImputedColumn>)> {
        let mut exprs = Vec::new();
        let mut imputed = Vec::new();

        for col_data in df.get_columns() {
            let missing = col_data.null_count();
            if missing == 0 {
                continue;
            }
            let name = col_data.name().to_string();

            let fill = match ColumnKind::of(col_data.dtype()) {
                ColumnKind::Numeric => {
                    let values = column::present_values(col_data)?;
                    if values.is_empty() {
                        FillValue::Unavailable
                    } else {
                        let mean = values.iter().sum::<f64>() / values.len() as f64;
                        exprs.push(
                            col(name.as_str())
                                .cast(DataType::Float64)
                                .fill_null(lit(mean)),
                        );
                        FillValue::Mean(mean)
                    }
                }
                ColumnKind::Categorical => {
                    let values = column::text_values(col_data)?;
                    match column::mode(values.iter().flatten()) {
                        Some((top, _)) => {
                            exprs.push(
                                col(name.as_str())
                                    .cast(DataType::String)
                                    .fill_null(lit(top.clone())),
                            );
                            FillValue::Mode(top)
                        }
                        None => FillValue::Unavailable,
                    }
                }
            };

            if fill == FillValue::Unavailable {
                log::warn!("column '{}' has no values to impute from", name);
            }
            imputed.push(ImputedColumn {
                name,
                missing,
                fill,
            });
        }

        if exprs.is_empty() {
            return Ok((df, imputed));
        }
        let filled = df.lazy().with_columns(exprs).collect()?;
        Ok((filled, imputed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "Age" => [Some(10.0), Some(20.0), None, Some(10.0)],
            "Work_Type" => [Some("a"), Some("a"), Some("b"), Some("a")],
            "Stroke" => [0i64, 1, 0, 0],
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_gap_takes_mean() {
        let mut df = df!(
            "BMI" => [Some(10.0), Some(20.0), None],
        )
        .unwrap();

        let report = DataCleaner::clean(&mut df).unwrap();
        let bmi: Vec<Option<f64>> = df.column("BMI").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(bmi, vec![Some(10.0), Some(20.0), Some(15.0)]);
        assert_eq!(report.imputed[0].fill, FillValue::Mean(15.0));
    }

    #[test]
    fn test_integer_gap_promotes_to_float() {
        let mut df = df!(
            "Age" => [Some(10i64), Some(20), None],
        )
        .unwrap();

        DataCleaner::clean(&mut df).unwrap();
        let age = df.column("Age").unwrap();
        assert_eq!(age.dtype(), &DataType::Float64);
        assert_eq!(age.f64().unwrap().get(2), Some(15.0));
    }

    #[test]
    fn test_categorical_gap_takes_mode() {
        let mut df = df!(
            "Id" => [0i64, 1, 2, 3],
            "Work_Type" => [Some("a"), Some("a"), Some("b"), None],
        )
        .unwrap();

        let report = DataCleaner::clean(&mut df).unwrap();
        assert_eq!(report.duplicates_removed, 0);
        assert_eq!(df.height(), 4);

        let work: Vec<Option<&str>> =
            df.column("Work_Type").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(work, vec![Some("a"), Some("a"), Some("b"), Some("a")]);
        assert_eq!(report.imputed.len(), 1);
        assert_eq!(report.imputed[0].name, "Work_Type");
        assert_eq!(report.imputed[0].missing, 1);
        assert_eq!(report.imputed[0].fill, FillValue::Mode("a".to_string()));
    }

    #[test]
    fn test_duplicates_removed_keeping_first() {
        let mut df = sample();
        let report = DataCleaner::clean(&mut df).unwrap();

        assert_eq!(report.rows_before, 4);
        assert_eq!(report.duplicates_removed, 1);
        // Row 2 was (None, "b", 0): it is filled with the mean of 10 and 20.
        let age: Vec<Option<f64>> = df.column("Age").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(age, vec![Some(10.0), Some(20.0), Some(15.0)]);
        assert_eq!(report.rows_after, 3);
    }

    #[test]
    fn test_no_duplicates_reported_as_zero() {
        let mut df = df!("Age" => [1i64, 2, 3]).unwrap();
        let report = DataCleaner::clean(&mut df).unwrap();
        assert_eq!(report.duplicates_removed, 0);
        assert!(report.is_noop());
        assert_eq!(df.height(), 3);
    }

    #[test]
    fn test_filled_rows_that_collide_are_deduplicated() {
        let mut df = df!(
            "Age" => [Some(10.0), Some(20.0), None, Some(15.0)],
            "Stroke" => [0i64, 0, 1, 1],
        )
        .unwrap();

        let report = DataCleaner::clean(&mut df).unwrap();
        assert_eq!(report.duplicates_removed, 0);
        assert_eq!(report.duplicates_after_imputation, 1);
        assert_eq!(df.height(), 3);
    }

    #[test]
    fn test_clean_is_idempotent_and_complete() {
        let mut df = df!(
            "Age" => [Some(10.0), Some(20.0), None, Some(10.0), Some(20.0)],
            "Sex" => [Some("F"), None, Some("M"), Some("F"), None],
            "Stroke" => [Some(0i64), Some(1), Some(0), Some(0), Some(1)],
        )
        .unwrap();

        DataCleaner::clean(&mut df).unwrap();
        let once = df.clone();
        let second = DataCleaner::clean(&mut df).unwrap();

        assert!(second.is_noop());
        assert!(df.equals_missing(&once));
        for col_data in df.get_columns() {
            assert_eq!(col_data.null_count(), 0, "column {}", col_data.name());
        }
        let deduped = DataCleaner::drop_duplicates(&df).unwrap();
        assert_eq!(deduped.height(), df.height());
    }

    #[test]
    fn test_all_missing_column_is_left_alone() {
        let mut df = df!(
            "Age" => [1i64, 2],
            "Note" => [None::<&str>, None],
        )
        .unwrap();

        let report = DataCleaner::clean(&mut df).unwrap();
        assert_eq!(report.imputed[0].fill, FillValue::Unavailable);
        assert_eq!(df.column("Note").unwrap().null_count(), 2);
        assert!(report.is_noop());
        assert_eq!(report.unfillable().count(), 1);
        assert_eq!(report.filled().count(), 0);
    }

    #[test]
    fn test_second_pass_with_empty_column_is_noop() {
        let mut df = df!(
            "Age" => [Some(10.0), None, Some(30.0)],
            "Note" => [None::<&str>, None, None],
        )
        .unwrap();

        let first = DataCleaner::clean(&mut df).unwrap();
        assert!(!first.is_noop());
        assert_eq!(first.filled().count(), 1);

        let second = DataCleaner::clean(&mut df).unwrap();
        assert!(second.is_noop());
        assert_eq!(second.unfillable().count(), 1);
    }
}

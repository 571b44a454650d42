//! Query Module
//! Threshold search and single-key stable sort over the working table.

use crate::config::ColumnNames;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Enter a valid number for the age threshold (got '{0}')")]
    InvalidThreshold(String),
    #[error("Invalid column choice '{0}'")]
    InvalidColumnChoice(String),
    #[error("Invalid sort direction '{0}', expected A or D")]
    InvalidDirection(String),
    #[error("Column '{0}' is not in the dataset")]
    MissingColumn(String),
    #[error("Query failed: {0}")]
    Polars(#[from] PolarsError),
}

/// Parameters of an age search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRequest {
    pub min_age: f64,
    pub stroke_only: bool,
}

impl SearchRequest {
    /// Only `y`/`Y` turns on the stroke filter.
    pub fn new(min_age: f64, stroke_only: &str) -> Self {
        Self {
            min_age,
            stroke_only: stroke_only.trim().eq_ignore_ascii_case("y"),
        }
    }

    pub fn parse_threshold(input: &str) -> Result<f64, QueryError> {
        let trimmed = input.trim();
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .ok_or_else(|| QueryError::InvalidThreshold(trimmed.to_string()))
    }
}

/// Matching records, in table order.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub matches: DataFrame,
}

impl SearchResult {
    pub fn count(&self) -> usize {
        self.matches.height()
    }

    pub fn preview(&self, limit: usize) -> DataFrame {
        self.matches.head(Some(limit))
    }

    pub fn is_truncated(&self, limit: usize) -> bool {
        self.count() > limit
    }
}

/// Columns offered for sorting, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Age,
    AverageGlucoseLevel,
    BodyMassIndex,
}

impl SortColumn {
    pub const ALL: [SortColumn; 3] = [
        SortColumn::Age,
        SortColumn::AverageGlucoseLevel,
        SortColumn::BodyMassIndex,
    ];

    /// Parse a 1-based menu choice.
    pub fn from_choice(input: &str) -> Result<Self, QueryError> {
        let trimmed = input.trim();
        trimmed
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or_else(|| QueryError::InvalidColumnChoice(trimmed.to_string()))
    }

    pub fn column_name<'a>(&self, names: &'a ColumnNames) -> &'a str {
        match self {
            SortColumn::Age => &names.age,
            SortColumn::AverageGlucoseLevel => &names.glucose,
            SortColumn::BodyMassIndex => &names.bmi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "a" | "asc" => Ok(SortDirection::Ascending),
            "d" | "desc" => Ok(SortDirection::Descending),
            _ => Err(QueryError::InvalidDirection(trimmed.to_string())),
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, SortDirection::Descending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortRequest {
    pub column: SortColumn,
    pub direction: SortDirection,
}

#[derive(Debug, Clone)]
pub struct SortResult {
    pub column: String,
    pub sorted: DataFrame,
    /// Columns shown in the preview; empty means all of them.
    pub display_columns: Vec<String>,
}

impl SortResult {
    pub fn preview(&self, limit: usize) -> PolarsResult<DataFrame> {
        let top = self.sorted.head(Some(limit));
        if self.display_columns.is_empty() {
            Ok(top)
        } else {
            top.select(self.display_columns.iter().cloned())
        }
    }
}

pub struct QueryEngine;

impl QueryEngine {
    /// Records with `age >= min_age`, optionally restricted to stroke cases.
    pub fn search(
        df: &DataFrame,
        request: &SearchRequest,
        names: &ColumnNames,
    ) -> Result<SearchResult, QueryError> {
        require_column(df, &names.age)?;
        if request.stroke_only {
            require_column(df, &names.stroke)?;
        }
        log::debug!(
            "search: {} >= {}, stroke only: {}",
            names.age,
            request.min_age,
            request.stroke_only
        );

        let mut query = df
            .clone()
            .lazy()
            .filter(col(names.age.as_str()).gt_eq(lit(request.min_age)));
        if request.stroke_only {
            query = query.filter(col(names.stroke.as_str()).eq(lit(1)));
        }

        Ok(SearchResult {
            matches: query.collect()?,
        })
    }

    /// Stable sort by one column; ties keep their current relative order.
    pub fn sort(
        df: &DataFrame,
        request: &SortRequest,
        names: &ColumnNames,
    ) -> Result<SortResult, QueryError> {
        let column = request.column.column_name(names);
        require_column(df, column)?;
        log::debug!("sort: {} {:?}", column, request.direction);

        let sorted = df
            .clone()
            .lazy()
            .sort_by_exprs(
                [col(column)],
                SortMultipleOptions::default()
                    .with_order_descending(request.direction.is_descending())
                    .with_nulls_last(true)
                    .with_maintain_order(true),
            )
            .collect()?;

        Ok(SortResult {
            column: column.to_string(),
            display_columns: display_columns(df, column, names),
            sorted,
        })
    }
}

fn require_column(df: &DataFrame, name: &str) -> Result<(), QueryError> {
    if df.column(name).is_ok() {
        Ok(())
    } else {
        Err(QueryError::MissingColumn(name.to_string()))
    }
}

/// Sort column followed by whichever of identity, outcome and work type exist.
///
/// Falls back to every column when none of them do.
fn display_columns(df: &DataFrame, sort_column: &str, names: &ColumnNames) -> Vec<String> {
    let has = |name: &str| df.column(name).is_ok() && name != sort_column;

    let mut extras: Vec<String> = Vec::new();
    if let Some(identity) = names.identity.iter().find(|n| has(n.as_str())) {
        extras.push(identity.clone());
    }
    for name in [&names.stroke, &names.work_type] {
        if has(name.as_str()) && !extras.contains(name) {
            extras.push(name.clone());
        }
    }

    if extras.is_empty() {
        return Vec::new();
    }
    let mut columns = vec![sort_column.to_string()];
    columns.extend(extras);
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patients() -> DataFrame {
        df!(
            "Age" => [10.0, 45.0, 60.0, 80.0],
            "Stroke" => [0i64, 1, 0, 1],
        )
        .unwrap()
    }

    fn sort_request(column: &str, direction: &str) -> SortRequest {
        SortRequest {
            column: SortColumn::from_choice(column).unwrap(),
            direction: SortDirection::parse(direction).unwrap(),
        }
    }

    fn ages(df: &DataFrame) -> Vec<f64> {
        df.column("Age")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect()
    }

    #[test]
    fn test_search_with_stroke_filter() {
        let request = SearchRequest::new(50.0, "y");
        let result = QueryEngine::search(&patients(), &request, &ColumnNames::default()).unwrap();

        assert_eq!(result.count(), 1);
        assert_eq!(ages(&result.matches), vec![80.0]);
    }

    #[test]
    fn test_search_keeps_table_order() {
        let request = SearchRequest::new(45.0, "n");
        let result = QueryEngine::search(&patients(), &request, &ColumnNames::default()).unwrap();

        assert_eq!(ages(&result.matches), vec![45.0, 60.0, 80.0]);
        assert!(result.is_truncated(2));
        assert_eq!(result.preview(2).height(), 2);
    }

    #[test]
    fn test_non_numeric_threshold_rejected() {
        assert!(matches!(
            SearchRequest::parse_threshold("fifty"),
            Err(QueryError::InvalidThreshold(s)) if s == "fifty"
        ));
        assert!(SearchRequest::parse_threshold("NaN").is_err());
        assert_eq!(SearchRequest::parse_threshold(" 45.5 ").unwrap(), 45.5);
        assert!(!SearchRequest::new(45.0, "n").stroke_only);
        assert!(SearchRequest::new(45.0, "Y").stroke_only);
    }

    #[test]
    fn test_search_without_age_column() {
        let df = df!("Stroke" => [0i64, 1]).unwrap();
        let request = SearchRequest::new(1.0, "n");
        assert!(matches!(
            QueryEngine::search(&df, &request, &ColumnNames::default()),
            Err(QueryError::MissingColumn(c)) if c == "Age"
        ));
    }

    #[test]
    fn test_sort_choices_validated() {
        assert_eq!(SortColumn::from_choice("3").unwrap(), SortColumn::BodyMassIndex);
        assert!(SortColumn::from_choice("0").is_err());
        assert!(SortColumn::from_choice("4").is_err());
        assert!(SortColumn::from_choice("bmi").is_err());
        assert_eq!(SortDirection::parse("A").unwrap(), SortDirection::Ascending);
        assert_eq!(SortDirection::parse("desc").unwrap(), SortDirection::Descending);
        assert!(matches!(
            SortDirection::parse("x"),
            Err(QueryError::InvalidDirection(_))
        ));
    }

    #[test]
    fn test_sort_is_stable_both_ways() {
        let df = df!(
            "BMI" => [30.0, 25.0, 30.0, 20.0],
            "Id" => ["first", "a", "second", "b"],
        )
        .unwrap();
        let names = ColumnNames::default();

        for direction in ["a", "d"] {
            let request = sort_request("3", direction);
            let result = QueryEngine::sort(&df, &request, &names).unwrap();
            let ids: Vec<&str> = result
                .sorted
                .column("Id")
                .unwrap()
                .str()
                .unwrap()
                .into_iter()
                .flatten()
                .collect();
            let first = ids.iter().position(|id| *id == "first").unwrap();
            let second = ids.iter().position(|id| *id == "second").unwrap();
            assert!(first < second, "direction {direction}: {ids:?}");
        }
    }

    #[test]
    fn test_sort_does_not_touch_input() {
        let df = patients();
        let request = sort_request("1", "d");
        let result = QueryEngine::sort(&df, &request, &ColumnNames::default()).unwrap();

        assert_eq!(ages(&result.sorted), vec![80.0, 60.0, 45.0, 10.0]);
        assert_eq!(ages(&df), vec![10.0, 45.0, 60.0, 80.0]);
    }

    #[test]
    fn test_display_columns_prefer_sex_then_gender() {
        let df = df!(
            "Age" => [1.0],
            "Gender" => ["F"],
            "Stroke" => [0i64],
            "Work_Type" => ["Private"],
            "BMI" => [20.0],
        )
        .unwrap();
        let names = ColumnNames::default();

        let request = sort_request("1", "a");
        let result = QueryEngine::sort(&df, &request, &names).unwrap();
        assert_eq!(result.display_columns, vec!["Age", "Gender", "Stroke", "Work_Type"]);
        assert_eq!(result.preview(10).unwrap().width(), 4);
    }

    #[test]
    fn test_display_falls_back_to_all_columns() {
        let df = df!(
            "Age" => [1.0, 2.0],
            "Other" => ["x", "y"],
        )
        .unwrap();

        let request = sort_request("1", "a");
        let result = QueryEngine::sort(&df, &request, &ColumnNames::default()).unwrap();
        assert!(result.display_columns.is_empty());
        assert_eq!(result.preview(10).unwrap().width(), 2);
    }
}

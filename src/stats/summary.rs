//! Dataset summary: column types, numeric and categorical descriptions.

use crate::data::{column, ColumnKind};
use crate::stats::{DescriptiveStats, StatsCalculator};
use polars::prelude::*;
use rayon::prelude::*;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnType {
    pub name: String,
    pub dtype: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub name: String,
    pub stats: DescriptiveStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalSummary {
    pub name: String,
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

/// Read-only description of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub rows: usize,
    pub column_types: Vec<ColumnType>,
    pub numeric: Vec<NumericSummary>,
    pub categorical: Vec<CategoricalSummary>,
}

impl DatasetSummary {
    pub fn from_dataframe(df: &DataFrame) -> PolarsResult<Self> {
        let columns = df.get_columns();

        let column_types = columns
            .iter()
            .map(|c| ColumnType {
                name: c.name().to_string(),
                dtype: c.dtype().to_string(),
                kind: ColumnKind::of(c.dtype()),
            })
            .collect();

        let numeric = columns
            .par_iter()
            .filter(|c| ColumnKind::of(c.dtype()) == ColumnKind::Numeric)
            .map(|c| {
                let values = column::present_values(c)?;
                Ok(NumericSummary {
                    name: c.name().to_string(),
                    stats: StatsCalculator::compute_descriptive_stats(&values),
                })
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        let categorical = columns
            .iter()
            .filter(|c| ColumnKind::of(c.dtype()) == ColumnKind::Categorical)
            .map(Self::describe_categorical)
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(Self {
            rows: df.height(),
            column_types,
            numeric,
            categorical,
        })
    }

    fn describe_categorical(col_data: &Column) -> PolarsResult<CategoricalSummary> {
        let values: Vec<String> = column::text_values(col_data)?
            .into_iter()
            .flatten()
            .collect();

        let unique = col_data
            .as_materialized_series()
            .drop_nulls()
            .n_unique()?;

        let (top, freq) = match column::mode(&values) {
            Some((top, freq)) => (Some(top), freq),
            None => (None, 0),
        };

        Ok(CategoricalSummary {
            name: col_data.name().to_string(),
            count: values.len(),
            unique,
            top,
            freq,
        })
    }

    pub fn column_types_frame(&self) -> PolarsResult<DataFrame> {
        let types = &self.column_types;
        df!(
            "column" => types.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            "dtype" => types.iter().map(|c| c.dtype.as_str()).collect::<Vec<_>>(),
            "kind" => types.iter().map(|c| c.kind.to_string()).collect::<Vec<_>>(),
        )
    }

    /// One row per numeric column, laid out like a `describe()` table.
    pub fn numeric_frame(&self) -> PolarsResult<DataFrame> {
        let stat = |pick: fn(&DescriptiveStats) -> f64| -> Vec<f64> {
            self.numeric.iter().map(|n| pick(&n.stats)).collect()
        };
        df!(
            "column" => self.numeric.iter().map(|n| n.name.as_str()).collect::<Vec<_>>(),
            "count" => self.numeric.iter().map(|n| n.stats.count as u64).collect::<Vec<_>>(),
            "mean" => stat(|s| s.mean),
            "std" => stat(|s| s.std),
            "min" => stat(|s| s.min),
            "25%" => stat(|s| s.p25),
            "50%" => stat(|s| s.median),
            "75%" => stat(|s| s.p75),
            "max" => stat(|s| s.max),
        )
    }

    pub fn categorical_frame(&self) -> PolarsResult<DataFrame> {
        let cats = &self.categorical;
        df!(
            "column" => cats.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            "count" => cats.iter().map(|c| c.count as u64).collect::<Vec<_>>(),
            "unique" => cats.iter().map(|c| c.unique as u64).collect::<Vec<_>>(),
            "top" => cats.iter().map(|c| c.top.as_deref()).collect::<Vec<_>>(),
            "freq" => cats.iter().map(|c| c.freq as u64).collect::<Vec<_>>(),
        )
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = |built: PolarsResult<DataFrame>| built.map_err(|_| fmt::Error);

        writeln!(f, "1. Column types:")?;
        writeln!(f, "{}", frame(self.column_types_frame())?)?;

        writeln!(f)?;
        writeln!(f, "2. Numeric summary:")?;
        if self.numeric.is_empty() {
            writeln!(f, "   (no numeric columns)")?;
        } else {
            writeln!(f, "{}", frame(self.numeric_frame())?)?;
        }

        writeln!(f)?;
        writeln!(f, "3. Categorical summary:")?;
        if self.categorical.is_empty() {
            writeln!(f, "   (no categorical columns)")?;
        } else {
            writeln!(f, "{}", frame(self.categorical_frame())?)?;
        }
        Ok(())
    }
}

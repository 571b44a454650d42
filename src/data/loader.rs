//! CSV Data Loader Module
//! Reads the stroke dataset from disk using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Rows scanned when inferring column types.
const INFER_SCHEMA_ROWS: usize = 10000;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read file: {0}")]
    Csv(#[from] PolarsError),
}

/// Shape of a freshly loaded table, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub rows: usize,
    pub columns: usize,
}

pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file with a header row.
    ///
    /// Malformed rows fail the whole load instead of being skipped.
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.exists() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .finish()?
            .collect()?;

        log::info!(
            "loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );
        Ok(df)
    }
}

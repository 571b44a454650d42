//! CSV Exporter Module
//! Writes the working table back to disk.

use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to save data: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to save data: {0}")]
    Csv(#[from] PolarsError),
}

pub struct DataExporter;

impl DataExporter {
    /// Write `df` with a header row, replacing any existing file.
    pub fn export_csv(df: &DataFrame, output_path: &Path) -> Result<PathBuf, ExportError> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = File::create(output_path)?;
        let mut out = df.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut out)?;

        log::info!("exported {} rows to {}", out.height(), output_path.display());
        Ok(output_path.to_path_buf())
    }
}

//! Table Store
//! Owns the working table and the snapshot captured at load time.

use crate::config::ColumnNames;
use crate::data::{
    CleanReport, DataCleaner, DataExporter, DataLoader, ExportError, LoadReport, LoaderError,
    QueryEngine, QueryError, SearchRequest, SearchResult, SortRequest, SortResult,
};
use polars::prelude::*;
use std::path::{Path, PathBuf};

pub struct TableStore {
    df: DataFrame,
    raw_df: DataFrame,
    file_path: Option<PathBuf>,
}

impl TableStore {
    /// Wrap an already loaded table.
    pub fn new(df: DataFrame) -> Self {
        Self {
            raw_df: df.clone(),
            df,
            file_path: None,
        }
    }

    pub fn load(file_path: &Path) -> Result<Self, LoaderError> {
        let df = DataLoader::load_csv(file_path)?;
        let mut store = Self::new(df);
        store.file_path = Some(file_path.to_path_buf());
        Ok(store)
    }

    pub fn load_report(&self) -> LoadReport {
        LoadReport {
            rows: self.df.height(),
            columns: self.df.width(),
        }
    }

    /// Get a reference to the working table.
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// The table exactly as loaded, never mutated.
    pub fn raw_dataframe(&self) -> &DataFrame {
        &self.raw_df
    }

    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.df.shape()
    }

    pub fn clean(&mut self) -> PolarsResult<CleanReport> {
        DataCleaner::clean(&mut self.df)
    }

    pub fn search(
        &self,
        request: &SearchRequest,
        names: &ColumnNames,
    ) -> Result<SearchResult, QueryError> {
        QueryEngine::search(&self.df, request, names)
    }

    pub fn sort(
        &self,
        request: &SortRequest,
        names: &ColumnNames,
    ) -> Result<SortResult, QueryError> {
        QueryEngine::sort(&self.df, request, names)
    }

    pub fn export(&self, output_path: &Path) -> Result<PathBuf, ExportError> {
        DataExporter::export_csv(&self.df, output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_leaves_snapshot_untouched() {
        let df = df!(
            "Age" => [Some(10.0), Some(10.0), None],
            "Stroke" => [0i64, 0, 1],
        )
        .unwrap();
        let mut store = TableStore::new(df.clone());

        let report = store.clean().unwrap();
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(store.shape(), (2, 2));
        assert!(store.raw_dataframe().equals_missing(&df));
        assert_eq!(store.raw_dataframe().height(), 3);
    }

    #[test]
    fn test_load_records_path_and_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stroke.csv");
        std::fs::write(&path, "Age,Stroke\n50,1\n20,0\n").unwrap();

        let store = TableStore::load(&path).unwrap();
        assert_eq!(store.load_report(), LoadReport { rows: 2, columns: 2 });
        assert_eq!(store.file_path(), Some(&path));
    }
}

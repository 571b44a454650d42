//! Application Configuration Module
//! Paths, display limits and dataset column names, optionally read from JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up next to the executable.
pub const CONFIG_FILE_NAME: &str = "stroke_explorer.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Names of the dataset fields the explorer works with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub age: String,
    pub stroke: String,
    pub glucose: String,
    pub bmi: String,
    pub work_type: String,
    /// Tried in order; the first one present is displayed.
    pub identity: Vec<String>,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            age: "Age".to_string(),
            stroke: "Stroke".to_string(),
            glucose: "Average_Glucose_Level".to_string(),
            bmi: "BMI".to_string(),
            work_type: "Work_Type".to_string(),
            identity: vec!["Sex".to_string(), "Gender".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub export_path: PathBuf,
    pub chart_dir: PathBuf,
    pub display_limit: usize,
    pub histogram_bins: usize,
    pub open_charts: bool,
    pub clear_screen: bool,
    pub columns: ColumnNames,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/stroke_dataset.csv"),
            export_path: PathBuf::from("data/cleaned_stroke_data.csv"),
            chart_dir: PathBuf::from("charts"),
            display_limit: 10,
            histogram_bins: 20,
            open_charts: true,
            clear_screen: true,
            columns: ColumnNames::default(),
        }
    }
}

impl AppConfig {
    /// Load the first `stroke_explorer.json` found in `search_dirs`, then
    /// anchor a relative input path at the first directory that holds it.
    /// The export and chart paths stay relative to the working directory
    /// unless the file makes them absolute.
    pub fn load(search_dirs: &[PathBuf]) -> Result<Self, ConfigError> {
        let config_path = search_dirs
            .iter()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|path| path.is_file());

        let mut config = match config_path {
            Some(path) => {
                log::info!("reading configuration from {}", path.display());
                let text = fs::read_to_string(&path)?;
                serde_json::from_str::<AppConfig>(&text)?
            }
            None => AppConfig::default(),
        };

        if config.data_path.is_relative() {
            config.data_path = resolve(&config.data_path, search_dirs);
        }
        Ok(config)
    }

    /// Directories searched for the config file and a relative data file:
    /// the executable's directory, the crate root it was built from, then
    /// the working directory.
    pub fn search_dirs() -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            dirs.push(exe_dir);
        }
        dirs.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")));
        if let Ok(cwd) = std::env::current_dir() {
            dirs.push(cwd);
        }
        dirs
    }
}

/// First existing `dir/relative`, else the first candidate so a load error
/// names a concrete path.
fn resolve(relative: &Path, search_dirs: &[PathBuf]) -> PathBuf {
    search_dirs
        .iter()
        .map(|dir| dir.join(relative))
        .find(|path| path.exists())
        .or_else(|| search_dirs.first().map(|dir| dir.join(relative)))
        .unwrap_or_else(|| relative.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&[dir.path().to_path_buf()]).unwrap();

        assert_eq!(config.display_limit, 10);
        assert_eq!(config.columns, ColumnNames::default());
        assert_eq!(config.data_path, dir.path().join("data/stroke_dataset.csv"));
        assert_eq!(config.export_path, PathBuf::from("data/cleaned_stroke_data.csv"));
    }

    #[test]
    fn test_default_data_path_finds_bundled_dataset() {
        let config = AppConfig::load(&AppConfig::search_dirs()).unwrap();

        let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/stroke_dataset.csv");
        assert_eq!(config.data_path, bundled);
        assert!(config.data_path.is_file());
    }

    #[test]
    fn test_data_path_falls_back_to_later_dir() {
        let exe_dir = tempfile::tempdir().unwrap();
        let crate_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(crate_dir.path().join("data")).unwrap();
        fs::write(crate_dir.path().join("data/stroke_dataset.csv"), "Age\n1\n").unwrap();

        let dirs = [exe_dir.path().to_path_buf(), crate_dir.path().to_path_buf()];
        let config = AppConfig::load(&dirs).unwrap();
        assert_eq!(config.data_path, crate_dir.path().join("data/stroke_dataset.csv"));
    }

    #[test]
    fn test_first_config_file_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(first.path().join(CONFIG_FILE_NAME), r#"{ "display_limit": 3 }"#).unwrap();
        fs::write(second.path().join(CONFIG_FILE_NAME), r#"{ "display_limit": 7 }"#).unwrap();

        let dirs = [first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(AppConfig::load(&dirs).unwrap().display_limit, 3);
    }

    #[test]
    fn test_partial_file_overrides_fields() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "display_limit": 5, "columns": { "age": "age_years" } }"#,
        )
        .unwrap();

        let config = AppConfig::load(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(config.display_limit, 5);
        assert_eq!(config.columns.age, "age_years");
        assert_eq!(config.columns.stroke, "Stroke");
        assert!(config.open_charts);
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();

        assert!(matches!(
            AppConfig::load(&[dir.path().to_path_buf()]),
            Err(ConfigError::Parse(_))
        ));
    }
}

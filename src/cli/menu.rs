//! Menu choices and their on-screen listings.

use crate::charts::ChartKind;
use crate::config::ColumnNames;
use crate::data::SortColumn;
use std::fmt::Write as _;

pub const APP_TITLE: &str = "STROKE ANALYSIS APP";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainChoice {
    Exit,
    Summary,
    Clean,
    Search,
    Sort,
    Visualize,
    Export,
}

impl MainChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "0" => Some(MainChoice::Exit),
            "1" => Some(MainChoice::Summary),
            "2" => Some(MainChoice::Clean),
            "3" => Some(MainChoice::Search),
            "4" => Some(MainChoice::Sort),
            "5" => Some(MainChoice::Visualize),
            "6" => Some(MainChoice::Export),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartChoice {
    Back,
    Chart(ChartKind),
}

impl ChartChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "0" => Some(ChartChoice::Back),
            "1" => Some(ChartChoice::Chart(ChartKind::OutcomeShare)),
            "2" => Some(ChartChoice::Chart(ChartKind::Correlation)),
            "3" => Some(ChartChoice::Chart(ChartKind::AgeDistribution)),
            "4" => Some(ChartChoice::Chart(ChartKind::BmiVsGlucose)),
            _ => None,
        }
    }
}

pub fn main_menu() -> String {
    let rule = "=".repeat(40);
    format!(
        "{rule}\n{:^40}\n{rule}\n\
         1. Show Data Info & Statistics\n\
         2. Clean Data\n\
         3. Search Data\n\
         4. Sort Data\n\
         5. Visualize Data\n\
         6. Export Cleaned Data to CSV\n\
         0. Exit\n\
         {rule}",
        APP_TITLE
    )
}

pub fn chart_menu() -> String {
    "--- [VISUALIZATION MENU] ---\n\
     1. Stroke Distribution (Pie Chart)\n\
     2. Correlation Matrix (Heatmap)\n\
     3. Age Distribution (Histogram & KDE)\n\
     4. Glucose vs BMI (Scatter)\n\
     0. Back to Main Menu"
        .to_string()
}

pub fn sort_menu(names: &ColumnNames) -> String {
    let mut menu = String::from("Choose a column to sort by:");
    for (i, column) in SortColumn::ALL.iter().enumerate() {
        let _ = write!(menu, "\n{}. {}", i + 1, column.column_name(names));
    }
    menu
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_choices() {
        assert_eq!(MainChoice::parse("0"), Some(MainChoice::Exit));
        assert_eq!(MainChoice::parse(" 6 "), Some(MainChoice::Export));
        assert_eq!(MainChoice::parse("7"), None);
        assert_eq!(MainChoice::parse("one"), None);
        assert_eq!(MainChoice::parse(""), None);
    }

    #[test]
    fn test_chart_choices() {
        assert_eq!(ChartChoice::parse("0"), Some(ChartChoice::Back));
        assert_eq!(
            ChartChoice::parse("2"),
            Some(ChartChoice::Chart(ChartKind::Correlation))
        );
        assert_eq!(ChartChoice::parse("5"), None);
    }

    #[test]
    fn test_sort_menu_uses_configured_names() {
        let menu = sort_menu(&ColumnNames::default());
        assert!(menu.contains("1. Age"));
        assert!(menu.contains("2. Average_Glucose_Level"));
        assert!(menu.contains("3. BMI"));
    }
}

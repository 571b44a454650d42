//! Stroke Explorer Main Application
//! Menu loop dispatching to table operations; all terminal I/O lives here.

use crate::charts::StaticChartRenderer;
use crate::cli::console::Console;
use crate::cli::menu::{self, ChartChoice, MainChoice};
use crate::config::AppConfig;
use crate::data::{CleanReport, SearchRequest, SortColumn, SortDirection, SortRequest, TableStore};
use crate::stats::DatasetSummary;
use std::io::{self, BufRead, Write};

/// Whether the session goes on after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Main application loop.
pub struct StrokeExplorerApp<R, W> {
    store: TableStore,
    config: AppConfig,
    renderer: StaticChartRenderer,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> StrokeExplorerApp<R, W> {
    pub fn new(store: TableStore, config: AppConfig, console: Console<R, W>) -> Self {
        let renderer = StaticChartRenderer::new(
            config.chart_dir.clone(),
            config.columns.clone(),
            config.histogram_bins,
        );
        Self {
            store,
            config,
            renderer,
            console,
        }
    }

    /// Load the configured dataset. A failure is reported and yields `None`;
    /// the menu must not be shown then.
    pub fn start(config: AppConfig, mut console: Console<R, W>) -> io::Result<Option<Self>> {
        writeln!(
            console,
            "\n[LOADING] Reading data from '{}'...",
            config.data_path.display()
        )?;

        let store = match TableStore::load(&config.data_path) {
            Ok(store) => store,
            Err(e) => {
                log::debug!("startup load failed: {:?}", e);
                writeln!(console, "[ERROR] {}", e)?;
                return Ok(None);
            }
        };

        let report = store.load_report();
        writeln!(
            console,
            "[SUCCESS] Data loaded! Rows: {}, Columns: {}",
            report.rows, report.columns
        )?;
        if !console.pause("\nData ready. Press [Enter] to open the menu...")? {
            return Ok(None);
        }

        Ok(Some(Self::new(store, config, console)))
    }

    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.console.clear()?;
            writeln!(self.console, "{}", menu::main_menu())?;

            let Some(input) = self.console.prompt("Choose menu (0-6): ")? else {
                break;
            };

            let Some(choice) = MainChoice::parse(&input) else {
                writeln!(self.console, "[ERROR] Invalid input, try again.")?;
                if !self.console.pause("\nPress [Enter] to continue...")? {
                    break;
                }
                continue;
            };

            if choice == MainChoice::Exit {
                break;
            }

            writeln!(self.console, "\n{}", "-".repeat(30))?;
            let flow = match choice {
                MainChoice::Summary => self.show_summary()?,
                MainChoice::Clean => self.clean_data()?,
                MainChoice::Search => self.search_data()?,
                MainChoice::Sort => self.sort_data()?,
                MainChoice::Visualize => self.visualization_menu()?,
                MainChoice::Export => self.export_cleaned_data()?,
                MainChoice::Exit => Flow::Quit,
            };
            if flow == Flow::Quit {
                break;
            }

            if !self
                .console
                .pause("\nPress [Enter] to return to the main menu...")?
            {
                break;
            }
        }

        writeln!(self.console, "Thank you for using this application. Bye!")?;
        Ok(())
    }

    fn show_summary(&mut self) -> io::Result<Flow> {
        writeln!(self.console, "\n--- [DESCRIPTIVE STATISTICS] ---")?;

        if let Some(path) = self.store.file_path() {
            writeln!(self.console, "Source: {}", path.display())?;
        }
        let (rows, columns) = self.store.shape();
        let (raw_rows, _) = self.store.raw_dataframe().shape();
        writeln!(
            self.console,
            "Current table: {} rows x {} columns ({} rows as loaded)\n",
            rows, columns, raw_rows
        )?;

        match DatasetSummary::from_dataframe(self.store.dataframe()) {
            Ok(summary) => write!(self.console, "{}", summary)?,
            Err(e) => writeln!(self.console, "[ERROR] Failed to summarize data: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn clean_data(&mut self) -> io::Result<Flow> {
        writeln!(self.console, "\n--- [DATA CLEANING] ---")?;

        match self.store.clean() {
            Ok(report) => self.print_clean_report(&report)?,
            Err(e) => writeln!(self.console, "[ERROR] Cleaning failed: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn print_clean_report(&mut self, report: &CleanReport) -> io::Result<()> {
        if report.is_noop() {
            writeln!(self.console, "-> Table is already clean.")?;
            self.print_unfillable(report)?;
            return writeln!(
                self.console,
                "-> Current shape: ({}, {})",
                report.rows_after, report.columns
            );
        }

        if report.duplicates_removed > 0 {
            writeln!(
                self.console,
                "-> Found {} duplicate records. Removed.",
                report.duplicates_removed
            )?;
        } else {
            writeln!(self.console, "-> No duplicate records.")?;
        }

        if report.imputed.is_empty() {
            writeln!(self.console, "-> Data complete (no missing values).")?;
        } else {
            writeln!(self.console, "-> Missing values found:")?;
            for column in &report.imputed {
                writeln!(
                    self.console,
                    "   {:<24} {:>6}  -> {}",
                    column.name, column.missing, column.fill
                )?;
            }
            self.print_unfillable(report)?;
            writeln!(self.console, "-> Missing values filled (mean/mode imputation).")?;
        }

        if report.duplicates_after_imputation > 0 {
            writeln!(
                self.console,
                "-> {} records became identical after imputation. Removed.",
                report.duplicates_after_imputation
            )?;
        }

        writeln!(
            self.console,
            "-> Rows: {} -> {}",
            report.rows_before, report.rows_after
        )?;
        writeln!(
            self.console,
            "-> Current shape: ({}, {})",
            report.rows_after, report.columns
        )?;
        Ok(())
    }

    fn print_unfillable(&mut self, report: &CleanReport) -> io::Result<()> {
        for column in report.unfillable() {
            writeln!(
                self.console,
                "[WARN] Column '{}' has no values to impute from and stays incomplete.",
                column.name
            )?;
        }
        Ok(())
    }

    fn search_data(&mut self) -> io::Result<Flow> {
        writeln!(self.console, "\n--- [SEARCHING] ---")?;

        let Some(age_input) = self.console.prompt("Enter minimum age: ")? else {
            return Ok(Flow::Quit);
        };
        let min_age = match SearchRequest::parse_threshold(&age_input) {
            Ok(v) => v,
            Err(e) => {
                writeln!(self.console, "[ERROR] {}", e)?;
                return Ok(Flow::Continue);
            }
        };

        let Some(flag_input) = self.console.prompt("Show stroke patients only? (y/n): ")? else {
            return Ok(Flow::Quit);
        };
        let request = SearchRequest::new(min_age, &flag_input);

        let limit = self.config.display_limit;
        match self.store.search(&request, &self.config.columns) {
            Ok(result) => {
                let count = result.count();
                writeln!(self.console, "\n[RESULT] Found {} patients.", count)?;
                if count > 0 {
                    writeln!(self.console, "{}", result.preview(limit))?;
                    if result.is_truncated(limit) {
                        writeln!(self.console, "... (remaining rows hidden)")?;
                    }
                }
            }
            Err(e) => writeln!(self.console, "[ERROR] {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn sort_data(&mut self) -> io::Result<Flow> {
        writeln!(self.console, "\n--- [SORTING] ---")?;
        writeln!(self.console, "{}", menu::sort_menu(&self.config.columns))?;

        let prompt = format!("Enter choice (1-{}): ", SortColumn::ALL.len());
        let Some(column_input) = self.console.prompt(&prompt)? else {
            return Ok(Flow::Quit);
        };
        let column = match SortColumn::from_choice(&column_input) {
            Ok(column) => column,
            Err(e) => {
                writeln!(self.console, "[ERROR] {}", e)?;
                return Ok(Flow::Continue);
            }
        };

        let Some(direction_input) = self
            .console
            .prompt("Sort ascending (A) or descending (D)? ")?
        else {
            return Ok(Flow::Quit);
        };
        let direction = match SortDirection::parse(&direction_input) {
            Ok(direction) => direction,
            Err(e) => {
                writeln!(self.console, "[ERROR] {}", e)?;
                return Ok(Flow::Continue);
            }
        };

        let request = SortRequest { column, direction };
        let limit = self.config.display_limit;
        match self.store.sort(&request, &self.config.columns) {
            Ok(result) => {
                writeln!(
                    self.console,
                    "\n[RESULT] Top {} rows by '{}':",
                    limit, result.column
                )?;
                match result.preview(limit) {
                    Ok(view) => writeln!(self.console, "{}", view)?,
                    Err(e) => {
                        writeln!(self.console, "[WARN] Showing all columns. Detail: {}", e)?;
                        writeln!(self.console, "{}", result.sorted.head(Some(limit)))?;
                    }
                }
            }
            Err(e) => writeln!(self.console, "[ERROR] {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn visualization_menu(&mut self) -> io::Result<Flow> {
        loop {
            writeln!(self.console, "\n{}", menu::chart_menu())?;
            let Some(input) = self.console.prompt("Choose chart (1-4): ")? else {
                return Ok(Flow::Quit);
            };

            let kind = match ChartChoice::parse(&input) {
                Some(ChartChoice::Back) => return Ok(Flow::Continue),
                Some(ChartChoice::Chart(kind)) => kind,
                None => {
                    writeln!(self.console, "Invalid choice.")?;
                    continue;
                }
            };

            match self.renderer.render(kind, self.store.dataframe()) {
                Ok(path) => {
                    writeln!(self.console, "[SUCCESS] Chart saved to: {}", path.display())?;
                    if self.config.open_charts {
                        if let Err(e) = open::that(&path) {
                            log::warn!("could not open {}: {}", path.display(), e);
                            writeln!(self.console, "[WARN] Could not open chart viewer: {}", e)?;
                        }
                    }
                }
                Err(e) => writeln!(self.console, "[ERROR] {}", e)?,
            }
        }
    }

    fn export_cleaned_data(&mut self) -> io::Result<Flow> {
        match self.store.export(&self.config.export_path) {
            Ok(path) => writeln!(self.console, "\n[SUCCESS] Data saved to: {}", path.display())?,
            Err(e) => writeln!(self.console, "[ERROR] {}", e)?,
        }
        Ok(Flow::Continue)
    }
}

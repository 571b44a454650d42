//! Stroke Explorer - Interactive CSV Explorer for Stroke Patient Records
//!
//! Loads the dataset, then serves a numbered menu for cleaning, statistics,
//! search, sort, charts and export.

mod charts;
mod cli;
mod config;
mod data;
mod stats;

use anyhow::Context;
use cli::{Console, StrokeExplorerApp};
use config::AppConfig;
use std::io;

/// Print every column and allow wide rows when tables are displayed.
fn configure_table_display() {
    std::env::set_var("POLARS_FMT_MAX_COLS", "-1");
    std::env::set_var("POLARS_TABLE_WIDTH", "1000");
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    configure_table_display();

    let search_dirs = AppConfig::search_dirs();
    let config = AppConfig::load(&search_dirs)
        .with_context(|| format!("loading configuration from {:?}", search_dirs))?;
    log::debug!("configuration: {:?}", config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock(), config.clear_screen);
    console.clear()?;

    // A failed load ends the session before the menu, without an error exit.
    let Some(mut app) = StrokeExplorerApp::start(config, console)? else {
        return Ok(());
    };
    app.run()?;
    Ok(())
}

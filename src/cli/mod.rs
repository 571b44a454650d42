//! CLI module - interactive menu session

mod app;
mod console;
mod menu;

pub use app::StrokeExplorerApp;
pub use console::Console;

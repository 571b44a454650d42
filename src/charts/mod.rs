//! Charts module - Chart data and rendering

mod dataset;
mod renderer;

pub use dataset::{ChartDataset, ChartError, OutcomeGroup};
pub use renderer::{ChartKind, StaticChartRenderer};

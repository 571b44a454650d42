//! Stats module - descriptive statistics and summaries

mod calculator;
mod summary;

pub use calculator::{CorrelationMatrix, DescriptiveStats, StatsCalculator};
pub use summary::DatasetSummary;

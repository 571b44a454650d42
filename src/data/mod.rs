//! Data module - CSV loading, cleaning, querying and export

pub mod column;
mod cleaner;
mod exporter;
mod loader;
mod query;
mod store;

pub use cleaner::{CleanReport, DataCleaner};
pub use column::ColumnKind;
pub use exporter::{DataExporter, ExportError};
pub use loader::{DataLoader, LoadReport, LoaderError};
pub use query::{
    QueryEngine, QueryError, SearchRequest, SearchResult, SortColumn, SortDirection, SortRequest,
    SortResult,
};
pub use store::TableStore;

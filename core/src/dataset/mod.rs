//! Delimited-file ingestion: loading raw rows and cleaning them for validation.

mod clean;
mod loader;
mod table;

pub use clean::{clean, format_feature_name};
pub use loader::{load_dataset, parse_delimited, DELIMITER};
pub use table::RawTable;

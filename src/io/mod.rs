//! I/O module
//!
//! Handles reading source data and writing report output.
//!
//! # Components
//!
//! - `csv_format` - CSV export (row ordering, quoting, amount formatting)
//! - `json_source` - Repositories backed by JSON files on disk
//! - `summary` - Text summary and JSON rendering of a report

pub mod csv_format;
pub mod json_source;
pub mod summary;

pub use csv_format::{
    export_file_name, export_report, to_delimited_text, write_transactions_csv, CSV_CONTENT_TYPE,
    CSV_HEADER,
};
pub use json_source::JsonDirectorySource;
pub use summary::{write_json, write_summary};

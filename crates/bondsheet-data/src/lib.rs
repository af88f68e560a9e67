//! Rental bond data pipeline for the NSW bond cheatsheet dashboard.
//!
//! NSW Fair Trading publishes rental bond lodgements, refunds, and holdings
//! as Excel workbooks linked from a listing page. This crate discovers the
//! workbook links, downloads and decodes the workbooks, normalizes the rows,
//! and exports CSV files plus a refresh manifest for the dashboard's data
//! loaders.

pub mod catalog;
pub mod export;
pub mod fetch;
pub mod records;
pub mod refresh;
pub mod workbook;

pub use catalog::{extract_workbook_links, Dataset, DATA_LIST_URL, WORKBOOK_PREFIX};
pub use export::{read_manifest, update_manifest, write_csv, DataManifest, DatasetSummary};
pub use fetch::DataClient;
pub use records::{Holding, Lodgement, Refund};
pub use refresh::{refresh_dataset, refresh_datasets};
pub use workbook::{decode_holdings, decode_lodgements, decode_refunds};

/// Errors across the data pipeline.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("No workbook links found under {panel} on the listing page")]
    NoLinks { panel: String },

    #[error("Failed to decode workbook: {0}")]
    Workbook(String),

    #[error("Missing expected column {column:?} in {workbook}")]
    MissingColumn { column: String, workbook: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}

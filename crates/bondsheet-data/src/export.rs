//! CSV export and the refresh manifest.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DataError;

/// Name of the manifest written beside the CSV files.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Summary of one refreshed dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub dataset: String,
    pub rows: usize,
    pub workbooks: usize,
}

/// What a refresh wrote, for the dashboard's freshness display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataManifest {
    pub refreshed_at: DateTime<Utc>,
    pub datasets: Vec<DatasetSummary>,
}

/// Serialize records to one CSV file with a header row taken from the
/// record's field names.
pub fn write_csv<T: Serialize>(path: &Path, records: &[T]) -> Result<(), DataError> {
    let write_err = |message: String| DataError::Write {
        path: path.display().to_string(),
        message,
    };
    let mut writer = csv::Writer::from_path(path).map_err(|e| write_err(e.to_string()))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| write_err(e.to_string()))?;
    }
    writer.flush().map_err(|e| write_err(e.to_string()))?;
    Ok(())
}

/// Merge freshly refreshed summaries into the manifest, keeping entries for
/// datasets a partial refresh did not touch, and write it out.
pub fn update_manifest(
    dir: &Path,
    refreshed: Vec<DatasetSummary>,
) -> Result<DataManifest, DataError> {
    let mut datasets = read_manifest(dir).map(|m| m.datasets).unwrap_or_default();
    for summary in refreshed {
        datasets.retain(|existing| existing.dataset != summary.dataset);
        datasets.push(summary);
    }
    datasets.sort_by(|a, b| a.dataset.cmp(&b.dataset));

    let manifest = DataManifest {
        refreshed_at: Utc::now(),
        datasets,
    };
    let path = dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(&manifest).map_err(|e| DataError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    fs::write(&path, json).map_err(|e| DataError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(manifest)
}

/// Read the manifest if one exists and parses; anything else is treated as
/// no manifest.
pub fn read_manifest(dir: &Path) -> Option<DataManifest> {
    let text = fs::read_to_string(dir.join(MANIFEST_FILE)).ok()?;
    serde_json::from_str(&text).ok()
}

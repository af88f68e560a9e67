//! Dataset refresh orchestration.
//!
//! A refresh fetches the listing page once, then per dataset: extract the
//! workbook links, download and decode every workbook, write the combined
//! rows to CSV, and finally fold the results into the manifest.

use std::fs;
use std::path::Path;

use crate::catalog::{extract_workbook_links, Dataset};
use crate::export::{update_manifest, write_csv, DataManifest, DatasetSummary};
use crate::fetch::DataClient;
use crate::workbook::{decode_holdings, decode_lodgements, decode_refunds};
use crate::DataError;

/// Refresh the given datasets into `out_dir` and update the manifest.
pub async fn refresh_datasets(
    client: &DataClient,
    datasets: &[Dataset],
    out_dir: &Path,
) -> Result<DataManifest, DataError> {
    fs::create_dir_all(out_dir).map_err(|e| DataError::Write {
        path: out_dir.display().to_string(),
        message: e.to_string(),
    })?;

    tracing::debug!("Fetching dataset listing page");
    let listing = client.listing_page().await?;

    let mut summaries = Vec::new();
    for dataset in datasets {
        summaries.push(refresh_dataset(client, *dataset, &listing, out_dir).await?);
    }
    update_manifest(out_dir, summaries)
}

/// Refresh one dataset from already-fetched listing-page HTML.
pub async fn refresh_dataset(
    client: &DataClient,
    dataset: Dataset,
    listing_html: &str,
    out_dir: &Path,
) -> Result<DatasetSummary, DataError> {
    let links = extract_workbook_links(listing_html, dataset);
    if links.is_empty() {
        return Err(DataError::NoLinks {
            panel: dataset.panel_id().to_string(),
        });
    }
    tracing::info!("Found {} {} workbooks", links.len(), dataset);

    let path = out_dir.join(dataset.file_name());
    let rows = match dataset {
        Dataset::Lodgements => {
            let records = download_all(client, &links, decode_lodgements).await?;
            write_csv(&path, &records)?;
            records.len()
        }
        Dataset::Refunds => {
            let records = download_all(client, &links, decode_refunds).await?;
            write_csv(&path, &records)?;
            records.len()
        }
        Dataset::Holdings => {
            let records = download_all(client, &links, decode_holdings).await?;
            write_csv(&path, &records)?;
            records.len()
        }
    };
    tracing::info!("Wrote {} rows to {}", rows, path.display());

    Ok(DatasetSummary {
        dataset: dataset.label().to_string(),
        rows,
        workbooks: links.len(),
    })
}

async fn download_all<T>(
    client: &DataClient,
    links: &[String],
    decode: fn(&[u8], &str) -> Result<Vec<T>, DataError>,
) -> Result<Vec<T>, DataError> {
    let mut records = Vec::new();
    for (i, link) in links.iter().enumerate() {
        tracing::info!("Downloading workbook {}/{}", i + 1, links.len());
        tracing::debug!("GET {link}");
        let bytes = client.fetch_workbook(link).await?;
        records.extend(decode(&bytes, link)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn a_listing_page_without_workbook_links_is_an_error() {
        let dir = TempDir::new().unwrap();
        let client = DataClient::new();

        let result = refresh_dataset(
            &client,
            Dataset::Holdings,
            "<html><body></body></html>",
            dir.path(),
        )
        .await;

        match result {
            Err(DataError::NoLinks { panel }) => assert_eq!(panel, "panel3"),
            other => panic!("expected NoLinks, got {other:?}"),
        }
        assert!(!dir.path().join(Dataset::Holdings.file_name()).exists());
    }
}

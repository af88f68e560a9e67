//! Refresh the rental bond datasets.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bondsheet_data::{refresh_datasets, DataClient, Dataset};

/// Dataset selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DatasetArg {
    All,
    Holdings,
    Lodgements,
    Refunds,
}

impl DatasetArg {
    fn datasets(self) -> Vec<Dataset> {
        match self {
            DatasetArg::All => Dataset::ALL.to_vec(),
            DatasetArg::Holdings => vec![Dataset::Holdings],
            DatasetArg::Lodgements => vec![Dataset::Lodgements],
            DatasetArg::Refunds => vec![Dataset::Refunds],
        }
    }
}

/// Run the update command.
pub async fn run(config_path: &Path, dataset: DatasetArg, out: Option<PathBuf>) -> Result<()> {
    let out_dir = match out {
        Some(dir) => dir,
        None => default_data_dir(config_path)?,
    };

    tracing::info!("Refreshing rental bond data into {}", out_dir.display());

    let client = DataClient::new();
    let manifest = refresh_datasets(&client, &dataset.datasets(), &out_dir)
        .await
        .context("Dataset refresh failed")?;

    for summary in &manifest.datasets {
        tracing::info!(
            "{}: {} rows from {} workbook(s)",
            summary.dataset,
            summary.rows,
            summary.workbooks
        );
    }
    tracing::info!("Refresh complete");
    Ok(())
}

/// Datasets land under the content root so the generator picks them up;
/// without a config they land in ./data.
fn default_data_dir(config_path: &Path) -> Result<PathBuf> {
    let project = super::project_dir(config_path);
    Ok(match super::site_config_if_present(config_path)? {
        Some(config) => project.join(&config.root).join("data"),
        None => PathBuf::from("data"),
    })
}

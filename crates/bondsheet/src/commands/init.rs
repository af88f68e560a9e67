//! Scaffold a dashboard project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing bondsheet project...");

    let docs_dir = Path::new("docs");

    if docs_dir.exists() {
        if !yes {
            tracing::warn!("docs/ directory already exists. Use --yes to overwrite.");
            return Ok(());
        }
    } else {
        fs::create_dir_all(docs_dir).context("Failed to create docs directory")?;
    }

    let config_path = Path::new("bondsheet.toml");
    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG).context("Failed to write bondsheet.toml")?;
        tracing::info!("Created bondsheet.toml");
    }

    let index_path = docs_dir.join("index.md");
    if !index_path.exists() || yes {
        fs::write(&index_path, DEFAULT_INDEX).context("Failed to write index.md")?;
        tracing::info!("Created docs/index.md");
    }

    let data_path = docs_dir.join("data.md");
    if !data_path.exists() || yes {
        fs::write(&data_path, DEFAULT_DATA_PAGE).context("Failed to write data.md")?;
        tracing::info!("Created docs/data.md");
    }

    let about_path = docs_dir.join("about.md");
    if !about_path.exists() || yes {
        fs::write(&about_path, DEFAULT_ABOUT).context("Failed to write about.md")?;
        tracing::info!("Created docs/about.md");
    }

    let style_path = Path::new("style.css");
    if !style_path.exists() || yes {
        fs::write(style_path, DEFAULT_STYLE).context("Failed to write style.css")?;
        tracing::info!("Created style.css");
    }

    // Landing spot for `bondsheet update`
    let dataset_dir = docs_dir.join("data");
    if !dataset_dir.exists() {
        fs::create_dir_all(&dataset_dir).context("Failed to create docs/data directory")?;
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'bondsheet sync' to generate the site config,");
    tracing::info!("then 'bondsheet update' to fetch the rental bond datasets.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Bondsheet configuration
# Mirrored into observablehq.config.js by `bondsheet sync`.

# Site title, shown in the sidebar and browser tab
title = "NSW Bond Cheatsheet"

# Content source directory
root = "docs"

# Output directory of the site build
output = "dist"

# Custom stylesheet
style = "style.css"

# Sidebar pages, in display order. Remove this section to list every
# page alphabetically instead.
[[pages]]
name = "Cheatsheet"
path = "/index"

[[pages]]
name = "Data"
path = "/data"

[[pages]]
name = "About"
path = "/about"
"#;

const DEFAULT_INDEX: &str = r#"# NSW Bond Cheatsheet

Key numbers for renters and agents, drawn from the NSW Fair Trading
rental bond data.

## At a glance

- How many bonds are held in your postcode
- Typical weekly rent at lodgement
- How refunds split between tenants and agents

Head to the [Data](/data) page for the full tables.
"#;

const DEFAULT_DATA_PAGE: &str = r#"# Data

The tables below come straight from the refreshed CSV files. Run
`bondsheet update` to pull the latest publications.

## Holdings

Bonds held per postcode for the most recent month, from
`data/holdings.csv`.

## Lodgements

New bonds lodged, with dwelling type, bedrooms, and weekly rent, from
`data/lodgements.csv`.

## Refunds

Refunded bonds with the split between tenant and agent payments, from
`data/refunds.csv`.
"#;

const DEFAULT_ABOUT: &str = r#"# About

This dashboard summarizes the rental bond data that NSW Fair Trading
publishes each month.

Bond money is held by NSW Fair Trading for the duration of a tenancy.
The published workbooks cover lodgements, refunds, and total holdings by
postcode.

Figures are indicative only; refer to the source publications for
anything load-bearing.
"#;

const DEFAULT_STYLE: &str = r#":root {
  --theme-foreground-focus: #00843d;
  --sans-serif: "Segoe UI", Roboto, system-ui, sans-serif;
}

body {
  font-family: var(--sans-serif);
}

table {
  font-variant-numeric: tabular-nums;
}
"#;

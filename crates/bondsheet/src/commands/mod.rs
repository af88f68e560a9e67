//! CLI subcommands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bondsheet_site::{extract_site_config, SiteConfig, CONFIG_SCRIPT_NAME};

pub mod check;
pub mod init;
pub mod serve;
pub mod sync;
pub mod update;

/// Directory the config file lives in; project paths resolve relative to it.
pub(crate) fn project_dir(config_path: &Path) -> &Path {
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Load the site configuration when one exists: the native TOML file first,
/// falling back to extraction from an existing `observablehq.config.js`.
pub(crate) fn site_config_if_present(config_path: &Path) -> Result<Option<SiteConfig>> {
    if config_path.exists() {
        let config = SiteConfig::load(config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        tracing::debug!("Loaded config from {}", config_path.display());
        return Ok(Some(config));
    }

    let script_path = project_dir(config_path).join(CONFIG_SCRIPT_NAME);
    if script_path.exists() {
        let source = fs::read_to_string(&script_path)
            .with_context(|| format!("Failed to read {}", script_path.display()))?;
        let config = extract_site_config(&source)
            .with_context(|| format!("Failed to extract config from {}", script_path.display()))?;
        tracing::debug!("Extracted config from {}", script_path.display());
        return Ok(Some(config));
    }

    Ok(None)
}

/// Load the site configuration, erroring when neither source exists.
pub(crate) fn load_site_config(config_path: &Path) -> Result<SiteConfig> {
    site_config_if_present(config_path)?.ok_or_else(|| {
        anyhow::anyhow!(
            "No configuration found: neither {} nor {} exists. Run 'bondsheet init' first.",
            config_path.display(),
            CONFIG_SCRIPT_NAME
        )
    })
}

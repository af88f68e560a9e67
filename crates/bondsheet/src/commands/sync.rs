//! Generate the JavaScript config module from the native one.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bondsheet_site::{render_config_script, SiteConfig, CONFIG_SCRIPT_NAME, GENERATED_MARKER};

/// Run the sync command.
pub async fn run(config_path: &Path, out: Option<PathBuf>) -> Result<()> {
    if !config_path.exists() {
        anyhow::bail!(
            "{} not found. Run 'bondsheet init' first.",
            config_path.display()
        );
    }
    let config = SiteConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let out_path = out.unwrap_or_else(|| super::project_dir(config_path).join(CONFIG_SCRIPT_NAME));

    if let Ok(existing) = fs::read_to_string(&out_path) {
        if !existing.contains(GENERATED_MARKER) {
            tracing::warn!(
                "Overwriting hand-written {}; it was not generated by sync",
                out_path.display()
            );
        }
    }

    let script = render_config_script(&config);
    fs::write(&out_path, script)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    tracing::info!("Wrote {}", out_path.display());
    Ok(())
}

//! Validate the site configuration.

use std::path::Path;

use anyhow::Result;
use bondsheet_site::{validate, Severity};

/// Run the check command.
pub async fn run(config_path: &Path, strict: bool) -> Result<()> {
    let config = super::load_site_config(config_path)?;
    let project = super::project_dir(config_path);

    let report = validate(&config, project);

    for issue in &report.issues {
        match issue.severity {
            Severity::Error => tracing::error!("{}", issue.message),
            Severity::Warning => tracing::warn!("{}", issue.message),
            Severity::Note => tracing::info!("{}", issue.message),
        }
    }

    let errors = report.count(Severity::Error);
    let warnings = report.count(Severity::Warning);
    if !report.passed(strict) {
        anyhow::bail!("Configuration check failed: {errors} error(s), {warnings} warning(s)");
    }

    tracing::info!(
        "Configuration OK: {} page(s), {} warning(s), {} note(s)",
        config.effective_pages(project).len(),
        warnings,
        report.count(Severity::Note)
    );
    Ok(())
}

//! Preview the built site.

use std::path::{Path, PathBuf};

use anyhow::Result;
use bondsheet_server::{PreviewConfig, PreviewServer};

/// Run the serve command.
pub async fn run(
    config_path: &Path,
    port: u16,
    dir: Option<PathBuf>,
    open: bool,
    watch: bool,
) -> Result<()> {
    let site_dir = match dir {
        Some(dir) => dir,
        None => {
            let project = super::project_dir(config_path);
            match super::site_config_if_present(config_path)? {
                Some(config) => project.join(&config.output),
                None => PathBuf::from("dist"),
            }
        }
    };

    if !site_dir.is_dir() {
        anyhow::bail!(
            "Directory not found: {}. Build the site first.",
            site_dir.display()
        );
    }

    let config = PreviewConfig {
        site_dir,
        port,
        host: "127.0.0.1".to_string(),
        open,
        watch,
    };
    PreviewServer::new(config).start().await?;
    Ok(())
}

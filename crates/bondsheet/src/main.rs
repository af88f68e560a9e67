//! Bondsheet CLI - companion toolkit for the NSW bond cheatsheet dashboard.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

use commands::update::DatasetArg;

#[derive(Parser)]
#[command(name = "bondsheet")]
#[command(about = "Companion toolkit for the NSW bond cheatsheet dashboard")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to bondsheet.toml config file
    #[arg(short, long, default_value = "bondsheet.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a dashboard project in the current directory
    Init {
        /// Overwrite files that already exist
        #[arg(short, long)]
        yes: bool,
    },

    /// Validate the site configuration against the project tree
    Check {
        /// Treat warnings as failures
        #[arg(long)]
        strict: bool,
    },

    /// Generate observablehq.config.js from bondsheet.toml
    Sync {
        /// Output path (defaults to observablehq.config.js next to the config)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Refresh rental bond datasets from NSW Fair Trading
    Update {
        /// Dataset to refresh (defaults to all)
        #[arg(value_enum)]
        dataset: Option<DatasetArg>,

        /// Output directory (defaults to <root>/data)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Preview the built site with live reload
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to the configured output)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,

        /// Do not watch for changes
        #[arg(long)]
        no_watch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(yes).await?;
        }
        Commands::Check { strict } => {
            commands::check::run(&cli.config, strict).await?;
        }
        Commands::Sync { out } => {
            commands::sync::run(&cli.config, out).await?;
        }
        Commands::Update { dataset, out } => {
            commands::update::run(&cli.config, dataset.unwrap_or(DatasetArg::All), out).await?;
        }
        Commands::Serve {
            port,
            dir,
            no_open,
            no_watch,
        } => {
            commands::serve::run(&cli.config, port, dir, !no_open, !no_watch).await?;
        }
    }

    Ok(())
}

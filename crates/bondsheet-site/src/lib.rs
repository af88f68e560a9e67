//! Site configuration for the NSW bond cheatsheet dashboard.
//!
//! Models the configuration the external static-site generator consumes, loads it
//! from the native `bondsheet.toml` or an existing `observablehq.config.js`,
//! validates it against the project tree, and renders it back to JavaScript.

pub mod config;
pub mod emit;
pub mod script;
pub mod validate;

pub use config::{ConfigError, PageEntry, SiteConfig};
pub use emit::{render_config_script, GENERATED_MARKER};
pub use script::{extract_site_config, ScriptError};
pub use validate::{validate, Issue, Severity, ValidationReport};

/// Conventional name of the JavaScript config module the generator reads.
pub const CONFIG_SCRIPT_NAME: &str = "observablehq.config.js";

//! Local preview for the built dashboard.
//!
//! Serves the external generator's output directory and pushes reloads to
//! connected browsers when files under it change. Stylesheet edits swap in
//! place; everything else reloads the page.

pub mod livereload;
pub mod server;
pub mod watcher;

pub use livereload::{ReloadHub, ReloadMessage};
pub use server::{PreviewConfig, PreviewServer, ServerError};
pub use watcher::{FileWatcher, WatchEvent};

//! Typed site configuration and TOML loading.

use std::fs;
use std::path::{Path, PathBuf};

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

/// Default content source directory.
pub const DEFAULT_ROOT: &str = "docs";

/// Default output directory of the external site build.
pub const DEFAULT_OUTPUT: &str = "dist";

/// One navigation entry: display text plus a route into the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    /// Text shown in the sidebar
    pub name: String,
    /// Route, e.g. `/data`, or an absolute URL for external links
    pub path: String,
}

impl PageEntry {
    /// Whether the path points outside the site. External entries render as
    /// plain links and are never resolved against the content root.
    pub fn is_external(&self) -> bool {
        self.path.starts_with("http://") || self.path.starts_with("https://")
    }
}

/// Site configuration, read once per invocation and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Project title, shown in the sidebar and the browser tab
    pub title: String,

    /// Explicit sidebar entries in display order. When absent the generator
    /// lists every page alphabetically instead.
    pub pages: Option<Vec<PageEntry>>,

    /// Custom stylesheet path, relative to the project directory
    pub style: Option<String>,

    /// Named built-in theme; a custom `style` takes precedence
    pub theme: Option<String>,

    /// Content source directory
    pub root: String,

    /// Directory the external build writes to
    pub output: String,

    /// HTML fragment rendered at the top of every page
    pub header: Option<String>,

    /// HTML fragment rendered at the bottom of every page
    pub footer: Option<String>,

    /// Show the table of contents
    pub toc: bool,

    /// Show previous and next links in the footer
    pub pager: bool,

    /// Enable search
    pub search: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            pages: None,
            style: None,
            theme: None,
            root: DEFAULT_ROOT.to_string(),
            output: DEFAULT_OUTPUT.to_string(),
            header: None,
            footer: None,
            toc: true,
            pager: true,
            search: false,
        }
    }
}

/// Errors loading the native configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(String),

    #[error("Failed to parse config: {path}: {message}")]
    Parse { path: String, message: String },
}

impl SiteConfig {
    /// Load the configuration from a TOML file. Missing keys fall back to
    /// the generator's defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Resolve a page route to its content file under `root`.
    ///
    /// `/data` resolves to `<root>/data.md`, falling back to
    /// `<root>/data/index.md`. Returns `None` for external URLs and for
    /// routes with no content file.
    pub fn resolve_page(&self, project_dir: &Path, path: &str) -> Option<PathBuf> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return None;
        }
        let root = project_dir.join(&self.root);
        let trimmed = path.trim_start_matches('/').trim_end_matches('/');
        if trimmed.is_empty() {
            let index = root.join("index.md");
            return index.exists().then_some(index);
        }
        let flat = root.join(format!("{trimmed}.md"));
        if flat.exists() {
            return Some(flat);
        }
        let nested = root.join(trimmed).join("index.md");
        nested.exists().then_some(nested)
    }

    /// The sidebar the generator will render: explicit `pages` when
    /// configured, otherwise every content file under `root` in alphabetical
    /// route order, titled by each page's first heading.
    pub fn effective_pages(&self, project_dir: &Path) -> Vec<PageEntry> {
        if let Some(pages) = &self.pages {
            return pages.clone();
        }
        content_routes(&project_dir.join(&self.root))
            .into_iter()
            .map(|(route, file)| PageEntry {
                name: page_display_name(&file),
                path: route,
            })
            .collect()
    }
}

/// All content files under `root`, as `(route, file)` pairs sorted by route.
/// Hidden files and directories are skipped.
pub(crate) fn content_routes(root: &Path) -> Vec<(String, PathBuf)> {
    let mut routes = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let hidden = relative
            .components()
            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'));
        if hidden {
            continue;
        }
        let route = format!(
            "/{}",
            relative.with_extension("").to_string_lossy().replace('\\', "/")
        );
        routes.push((route, path.to_path_buf()));
    }
    routes.sort();
    routes
}

/// Display name for a content file: its first Markdown heading, else the
/// capitalized file stem.
pub(crate) fn page_display_name(file: &Path) -> String {
    if let Ok(source) = fs::read_to_string(file) {
        if let Some(heading) = first_heading(&source) {
            return heading;
        }
    }
    let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or("Untitled");
    capitalize(stem)
}

/// Text of the first heading in a Markdown document.
pub(crate) fn first_heading(source: &str) -> Option<String> {
    let mut in_heading = false;
    let mut text = String::new();
    for event in Parser::new(source) {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => {
                let title = text.trim();
                if !title.is_empty() {
                    return Some(title.to_string());
                }
                in_heading = false;
                text.clear();
            }
            Event::Text(t) if in_heading => text.push_str(&t),
            Event::Code(t) if in_heading => text.push_str(&t),
            _ => {}
        }
    }
    None
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

//! Configuration validation against the project tree.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::config::{content_routes, page_display_name, PageEntry, SiteConfig};

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// A single validation finding.
#[derive(Debug, Clone)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Everything validation found, in discovery order.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    /// Number of findings at the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// Whether the configuration passes. Warnings fail the check in strict
    /// mode; notes never do.
    pub fn passed(&self, strict: bool) -> bool {
        !self.has_errors() && !(strict && self.count(Severity::Warning) > 0)
    }

    fn error(&mut self, message: String) {
        self.issues.push(Issue {
            severity: Severity::Error,
            message,
        });
    }

    fn warning(&mut self, message: String) {
        self.issues.push(Issue {
            severity: Severity::Warning,
            message,
        });
    }

    fn note(&mut self, message: String) {
        self.issues.push(Issue {
            severity: Severity::Note,
            message,
        });
    }
}

/// Validate a configuration against the project directory it describes.
///
/// Errors are violations the external generator would choke on or render
/// broken navigation for. Warnings flag configurations that work but
/// probably do not mean what they say. Notes surface content files with no
/// sidebar entry.
pub fn validate(config: &SiteConfig, project_dir: &Path) -> ValidationReport {
    let mut report = ValidationReport::default();

    if config.title.trim().is_empty() {
        report.error("title must be a non-empty string".to_string());
    }

    let root = project_dir.join(&config.root);
    if !root.exists() {
        report.error(format!("root directory not found: {}", config.root));
    } else if !root.is_dir() {
        report.error(format!("root is not a directory: {}", config.root));
    }

    if let Some(style) = &config.style {
        if !project_dir.join(style).exists() {
            report.error(format!("stylesheet not found: {style}"));
        }
        if config.theme.is_some() {
            report.warning("both style and theme are set; style takes precedence".to_string());
        }
    }

    if project_dir.join(&config.output).starts_with(&root) {
        report.warning(format!(
            "output directory {} is inside root {}; rebuilds will pick up their own output",
            config.output, config.root
        ));
    }

    if let Some(pages) = &config.pages {
        check_pages(config, project_dir, &root, pages, &mut report);
    }

    report
}

fn check_pages(
    config: &SiteConfig,
    project_dir: &Path,
    root: &Path,
    pages: &[PageEntry],
    report: &mut ValidationReport,
) {
    let mut seen = HashSet::new();
    for (i, page) in pages.iter().enumerate() {
        if page.name.trim().is_empty() {
            report.error(format!("pages[{i}]: name must be non-empty"));
        }
        if page.path.trim().is_empty() {
            report.error(format!("pages[{i}]: path must be non-empty"));
            continue;
        }
        if !seen.insert(page.path.trim_end_matches('/').to_string()) {
            report.error(format!("pages[{i}]: duplicate path {}", page.path));
        }
        if page.is_external() {
            continue;
        }
        if !page.path.starts_with('/') {
            report.warning(format!(
                "pages[{i}]: path {:?} should start with '/'",
                page.path
            ));
        }
        if root.is_dir() && config.resolve_page(project_dir, &page.path).is_none() {
            let trimmed = page.path.trim_start_matches('/').trim_end_matches('/');
            report.error(format!(
                "pages[{i}] ({}): no content file for {} (expected {}/{}.md or {}/{}/index.md)",
                page.name, page.path, config.root, trimmed, config.root, trimmed
            ));
        }
    }

    // Content files the sidebar never mentions are reachable but invisible.
    if root.is_dir() {
        let listed: HashSet<_> = pages
            .iter()
            .filter_map(|page| config.resolve_page(project_dir, &page.path))
            .collect();
        for (route, file) in content_routes(root) {
            if !listed.contains(&file) {
                report.note(format!(
                    "unlisted page: {route} ({}) has no sidebar entry",
                    page_display_name(&file)
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageEntry;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn dashboard_config() -> SiteConfig {
        SiteConfig {
            title: "NSW Bond Cheatsheet".to_string(),
            pages: Some(vec![
                PageEntry {
                    name: "Cheatsheet".to_string(),
                    path: "/index".to_string(),
                },
                PageEntry {
                    name: "Data".to_string(),
                    path: "/data".to_string(),
                },
            ]),
            style: Some("style.css".to_string()),
            ..SiteConfig::default()
        }
    }

    fn dashboard_project() -> TempDir {
        project(&[
            ("docs/index.md", "# NSW Bond Cheatsheet"),
            ("docs/data.md", "# Data"),
            ("style.css", "body { margin: 0; }"),
        ])
    }

    #[test]
    fn a_complete_project_passes_cleanly() {
        let dir = dashboard_project();

        let report = validate(&dashboard_config(), dir.path());

        assert!(report.issues.is_empty(), "unexpected: {:?}", report.issues);
        assert!(report.passed(true));
    }

    #[test]
    fn empty_title_is_an_error() {
        let dir = dashboard_project();
        let config = SiteConfig {
            title: "   ".to_string(),
            ..dashboard_config()
        };

        let report = validate(&config, dir.path());

        assert_eq!(report.count(Severity::Error), 1);
        assert!(report.issues[0].message.contains("title"));
        assert!(!report.passed(false));
    }

    #[test]
    fn missing_root_directory_is_an_error() {
        let dir = project(&[("style.css", "")]);
        let config = SiteConfig {
            pages: None,
            ..dashboard_config()
        };

        let report = validate(&config, dir.path());

        assert!(report.has_errors());
        assert!(report
            .issues
            .iter()
            .any(|i| i.message.contains("root directory not found")));
    }

    #[test]
    fn missing_stylesheet_is_an_error() {
        let dir = project(&[("docs/index.md", "# Home")]);
        let config = SiteConfig {
            title: "Bonds".to_string(),
            style: Some("style.css".to_string()),
            pages: None,
            ..SiteConfig::default()
        };

        let report = validate(&config, dir.path());

        assert!(report
            .issues
            .iter()
            .any(|i| i.severity == Severity::Error && i.message.contains("stylesheet not found")));
    }

    #[test]
    fn unresolved_page_path_is_an_error() {
        let dir = dashboard_project();
        let mut config = dashboard_config();
        config.pages.as_mut().unwrap().push(PageEntry {
            name: "Refunds".to_string(),
            path: "/refunds".to_string(),
        });

        let report = validate(&config, dir.path());

        let message = &report
            .issues
            .iter()
            .find(|i| i.severity == Severity::Error)
            .unwrap()
            .message;
        assert!(message.contains("/refunds"));
        assert!(message.contains("docs/refunds.md"));
    }

    #[test]
    fn external_pages_never_need_content_files() {
        let dir = dashboard_project();
        let mut config = dashboard_config();
        config.pages.as_mut().unwrap().push(PageEntry {
            name: "Fair Trading".to_string(),
            path: "https://www.fairtrading.nsw.gov.au/".to_string(),
        });

        let report = validate(&config, dir.path());

        assert!(!report.has_errors(), "unexpected: {:?}", report.issues);
    }

    #[test]
    fn duplicate_paths_are_an_error() {
        let dir = dashboard_project();
        let mut config = dashboard_config();
        config.pages.as_mut().unwrap().push(PageEntry {
            name: "Data again".to_string(),
            path: "/data/".to_string(),
        });

        let report = validate(&config, dir.path());

        assert!(report
            .issues
            .iter()
            .any(|i| i.severity == Severity::Error && i.message.contains("duplicate path")));
    }

    #[test]
    fn non_rooted_path_is_a_warning_promoted_by_strict() {
        let dir = dashboard_project();
        let mut config = dashboard_config();
        config.pages.as_mut().unwrap()[1].path = "data".to_string();

        let report = validate(&config, dir.path());

        assert_eq!(report.count(Severity::Error), 0);
        assert_eq!(report.count(Severity::Warning), 1);
        assert!(report.passed(false));
        assert!(!report.passed(true));
    }

    #[test]
    fn style_and_theme_together_warn() {
        let dir = dashboard_project();
        let config = SiteConfig {
            theme: Some("slate".to_string()),
            ..dashboard_config()
        };

        let report = validate(&config, dir.path());

        assert!(report
            .issues
            .iter()
            .any(|i| i.severity == Severity::Warning && i.message.contains("style takes precedence")));
    }

    #[test]
    fn output_inside_root_warns() {
        let dir = dashboard_project();
        let config = SiteConfig {
            output: "docs/dist".to_string(),
            ..dashboard_config()
        };

        let report = validate(&config, dir.path());

        assert!(report
            .issues
            .iter()
            .any(|i| i.severity == Severity::Warning && i.message.contains("inside root")));
    }

    #[test]
    fn unlisted_content_is_a_note_with_its_heading() {
        let dir = project(&[
            ("docs/index.md", "# NSW Bond Cheatsheet"),
            ("docs/data.md", "# Data"),
            ("docs/about.md", "# About the data"),
            ("style.css", ""),
        ]);

        let report = validate(&dashboard_config(), dir.path());

        assert_eq!(report.count(Severity::Note), 1);
        let note = &report.issues.last().unwrap().message;
        assert!(note.contains("/about"));
        assert!(note.contains("About the data"));
        // notes never fail the check, strict or not
        assert!(report.passed(true));
    }

    #[test]
    fn derived_sidebars_have_no_unlisted_notes() {
        let dir = project(&[
            ("docs/index.md", "# Home"),
            ("docs/extra.md", "# Extra"),
        ]);
        let config = SiteConfig {
            title: "Bonds".to_string(),
            ..SiteConfig::default()
        };

        let report = validate(&config, dir.path());

        assert_eq!(report.count(Severity::Note), 0);
        assert!(report.passed(true));
    }
}

//! Rendering a [`SiteConfig`] back to the JavaScript module the external
//! generator consumes.

use crate::config::{PageEntry, SiteConfig};

/// Marker written into generated config scripts so they can be told apart
/// from hand-written ones.
pub const GENERATED_MARKER: &str = "Generated by bondsheet";

/// Render the configuration as `observablehq.config.js` source.
///
/// Output is deterministic: fields appear in a fixed order, unset options
/// are omitted, and booleans only appear when they differ from the
/// generator's defaults.
pub fn render_config_script(config: &SiteConfig) -> String {
    let mut fields = Vec::new();

    fields.push(format!("    title: \"{}\",", escape_js(&config.title)));
    if let Some(pages) = &config.pages {
        fields.push(render_pages(pages));
    }
    if let Some(style) = &config.style {
        fields.push(format!("    style: \"{}\",", escape_js(style)));
    }
    if let Some(theme) = &config.theme {
        fields.push(format!("    theme: \"{}\",", escape_js(theme)));
    }
    fields.push(format!("    root: \"{}\",", escape_js(&config.root)));
    fields.push(format!("    output: \"{}\",", escape_js(&config.output)));
    if let Some(header) = &config.header {
        fields.push(format!("    header: \"{}\",", escape_js(header)));
    }
    if let Some(footer) = &config.footer {
        fields.push(format!("    footer: \"{}\",", escape_js(footer)));
    }
    if !config.toc {
        fields.push("    toc: false,".to_string());
    }
    if !config.pager {
        fields.push("    pager: false,".to_string());
    }
    if config.search {
        fields.push("    search: true,".to_string());
    }

    format!(
        "// {}; edit bondsheet.toml and run `bondsheet sync`.\nexport default {{\n{}\n}};\n",
        GENERATED_MARKER,
        fields.join("\n")
    )
}

fn render_pages(pages: &[PageEntry]) -> String {
    let entries: Vec<String> = pages
        .iter()
        .map(|page| {
            format!(
                "        {{name: \"{}\", path: \"{}\"}}",
                escape_js(&page.name),
                escape_js(&page.path)
            )
        })
        .collect();
    format!("    pages: [\n{}\n    ],", entries.join(",\n"))
}

/// Escape a string for a double-quoted JavaScript literal.
fn escape_js(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::extract_site_config;
    use pretty_assertions::assert_eq;

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
                PageEntry {
                    name: "About".to_string(),
                    path: "/about".to_string(),
                },
            ]),
            style: Some("style.css".to_string()),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn renders_the_dashboard_config() {
        let script = render_config_script(&dashboard_config());

        assert!(script.starts_with("// Generated by bondsheet"));
        assert!(script.contains("export default {"));
        assert!(script.contains("    title: \"NSW Bond Cheatsheet\","));
        assert!(script.contains("        {name: \"Cheatsheet\", path: \"/index\"}"));
        assert!(script.contains("        {name: \"About\", path: \"/about\"}"));
        assert!(script.contains("    style: \"style.css\","));
        assert!(script.contains("    root: \"docs\","));
        assert!(script.ends_with("};\n"));
    }

    #[test]
    fn default_booleans_and_unset_options_are_omitted() {
        let script = render_config_script(&dashboard_config());

        assert!(!script.contains("toc:"));
        assert!(!script.contains("pager:"));
        assert!(!script.contains("search:"));
        assert!(!script.contains("theme:"));
        assert!(!script.contains("header:"));
        assert!(!script.contains("footer:"));
    }

    #[test]
    fn non_default_booleans_are_written() {
        let config = SiteConfig {
            toc: false,
            pager: false,
            search: true,
            ..dashboard_config()
        };
        let script = render_config_script(&config);

        assert!(script.contains("    toc: false,"));
        assert!(script.contains("    pager: false,"));
        assert!(script.contains("    search: true,"));
    }

    #[test]
    fn titles_with_quotes_are_escaped() {
        let config = SiteConfig {
            title: "Bond \"Cheat\" Sheet".to_string(),
            ..SiteConfig::default()
        };
        let script = render_config_script(&config);

        assert!(script.contains(r#"title: "Bond \"Cheat\" Sheet","#));
    }

    #[test]
    fn rendered_config_extracts_back_unchanged() {
        let config = dashboard_config();

        let extracted = extract_site_config(&render_config_script(&config)).unwrap();

        assert_eq!(extracted, config);
    }

    #[test]
    fn titles_with_braces_round_trip() {
        let config = SiteConfig {
            title: "Bond } Sheet".to_string(),
            style: Some("style.css".to_string()),
            ..SiteConfig::default()
        };

        let extracted = extract_site_config(&render_config_script(&config)).unwrap();

        assert_eq!(extracted, config);
    }

    #[test]
    fn page_names_with_apostrophes_round_trip() {
        let config = SiteConfig {
            pages: Some(vec![PageEntry {
                name: "Renter's guide".to_string(),
                path: "/guide".to_string(),
            }]),
            ..dashboard_config()
        };

        let extracted = extract_site_config(&render_config_script(&config)).unwrap();

        assert_eq!(extracted, config);
    }

    #[test]
    fn empty_pages_render_as_empty_array() {
        let config = SiteConfig {
            pages: Some(vec![]),
            ..SiteConfig::default()
        };
        let script = render_config_script(&config);

        assert!(script.contains("pages: ["));
        let extracted = extract_site_config(&script).unwrap();
        assert_eq!(extracted.pages, Some(vec![]));
    }
}

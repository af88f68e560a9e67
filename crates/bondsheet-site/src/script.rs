//! Extraction of the site configuration from `observablehq.config.js`.
//!
//! The external generator consumes a JavaScript module whose default export
//! is the configuration object. Config files in the wild keep commented-out
//! options (`// root: "docs",`), so comments are stripped before any field
//! matching runs.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::{PageEntry, SiteConfig};

/// Errors for config scripts that cannot be used at all. A missing field is
/// not an error; it falls back to the generator's default.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("No default export found in config script")]
    MissingExport,

    #[error("Unterminated block comment in config script")]
    UnterminatedComment,

    #[error("Unbalanced brackets in pages array")]
    UnbalancedPages,
}

static EXPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"export\s+default\s*\{").expect("Invalid export regex"));

static STRING_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*:\s*(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)')"#)
        .expect("Invalid string field regex")
});

static BOOL_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*:\s*(true|false)\b")
        .expect("Invalid bool field regex")
});

static PAGES_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*pages\s*:\s*\[").expect("Invalid pages regex"));

static PAGE_ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\{\s*name\s*:\s*(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)')\s*,\s*path\s*:\s*(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)')\s*,?\s*\}"#,
    )
    .expect("Invalid page entry regex")
});

/// Extract the site configuration from JavaScript config source.
///
/// Recognizes the scalar fields and the `pages` array at the top level of
/// the default export; string values may freely contain braces, brackets,
/// comment markers, or the other quote style. Anything else in the script
/// (imports, helper functions, unknown options) is ignored.
pub fn extract_site_config(source: &str) -> Result<SiteConfig, ScriptError> {
    let stripped = strip_comments(source)?;
    let body = export_body(&stripped)?;

    let mut config = SiteConfig::default();
    if let Some(title) = extract_string_field(body, "title") {
        config.title = title;
    }
    config.style = extract_string_field(body, "style");
    config.theme = extract_string_field(body, "theme");
    config.header = extract_string_field(body, "header");
    config.footer = extract_string_field(body, "footer");
    if let Some(root) = extract_string_field(body, "root") {
        config.root = root;
    }
    if let Some(output) = extract_string_field(body, "output") {
        config.output = output;
    }
    if let Some(toc) = extract_bool_field(body, "toc") {
        config.toc = toc;
    }
    if let Some(pager) = extract_bool_field(body, "pager") {
        config.pager = pager;
    }
    if let Some(search) = extract_bool_field(body, "search") {
        config.search = search;
    }
    config.pages = extract_pages(body)?;
    Ok(config)
}

/// Remove line and block comments while leaving string contents and line
/// structure intact.
fn strip_comments(source: &str) -> Result<String, ScriptError> {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(quote) = in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == quote {
                in_string = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => {
                in_string = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                chars.next();
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                let mut terminated = false;
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && next == '/' {
                        terminated = true;
                        break;
                    }
                    prev = next;
                }
                if !terminated {
                    return Err(ScriptError::UnterminatedComment);
                }
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Slice the body of the default-export object literal. Falls back to the
/// rest of the source when the braces never balance.
fn export_body(source: &str) -> Result<&str, ScriptError> {
    let open = EXPORT_RE.find(source).ok_or(ScriptError::MissingExport)?;
    let start = open.end();
    match balanced_close(&source[start..], '{', '}') {
        Some(end) => Ok(&source[start..start + end]),
        None => Ok(&source[start..]),
    }
}

/// Offset of the delimiter closing an already-open `open`, skipping string
/// literals so a `}` or `]` inside a value never closes the scope early.
fn balanced_close(source: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 1usize;
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    for (i, c) in source.char_indices() {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                in_string = None;
            }
            continue;
        }
        if c == '"' || c == '\'' || c == '`' {
            in_string = Some(c);
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Split an object body into its top-level fields: segments between commas
/// that sit outside string literals and nested braces or brackets.
fn top_level_segments(body: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                in_string = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => in_string = Some(c),
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                segments.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < body.len() {
        segments.push(&body[start..]);
    }
    segments
}

fn extract_string_field(body: &str, key: &str) -> Option<String> {
    top_level_segments(body).into_iter().find_map(|segment| {
        let caps = STRING_FIELD_RE.captures(segment)?;
        (&caps[1] == key).then(|| quoted_capture(&caps, 2))
    })
}

fn extract_bool_field(body: &str, key: &str) -> Option<bool> {
    top_level_segments(body).into_iter().find_map(|segment| {
        let caps = BOOL_FIELD_RE.captures(segment)?;
        (&caps[1] == key).then(|| &caps[2] == "true")
    })
}

/// Parse the `pages` array into entries. `None` when the field is absent,
/// `Some(vec![])` for an explicitly empty array.
fn extract_pages(body: &str) -> Result<Option<Vec<PageEntry>>, ScriptError> {
    for segment in top_level_segments(body) {
        let Some(open) = PAGES_OPEN_RE.find(segment) else {
            continue;
        };
        let start = open.end();
        let Some(len) = balanced_close(&segment[start..], '[', ']') else {
            return Err(ScriptError::UnbalancedPages);
        };
        let entries = PAGE_ENTRY_RE
            .captures_iter(&segment[start..start + len])
            .map(|caps| PageEntry {
                name: quoted_capture(&caps, 1),
                path: quoted_capture(&caps, 3),
            })
            .collect();
        return Ok(Some(entries));
    }
    Ok(None)
}

/// Value of a quoted capture pair: `group` holds double-quoted content,
/// `group + 1` single-quoted.
fn quoted_capture(caps: &Captures<'_>, group: usize) -> String {
    caps.get(group)
        .or_else(|| caps.get(group + 1))
        .map(|m| unescape_js(m.as_str()))
        .unwrap_or_default()
}

fn unescape_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

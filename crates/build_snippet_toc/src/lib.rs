// crates/build_snippet_toc/src/lib.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*(#+)\s*(.*)").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Prepends a table of contents to every `*.{extension}` file directly under
/// `directory` (non-recursive).
///
/// The TOC is one bullet per heading line, in heading order, indented two
/// spaces per heading level past the first, linking to the heading's anchor
/// slug. A single blank line separates the TOC from the original content.
pub fn build(directory: &Path, extension: &str) -> Result<()> {
    let suffix = format!(".{}", extension);
    let entries = fs::read_dir(directory)
        .with_context(|| format!("Error reading directory {}", directory.display()))?;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Error reading directory {}", directory.display()))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if path.is_file() && name.ends_with(&suffix) {
            println!(" * {}", name);
            prepend_toc(&path)?;
        }
    }
    Ok(())
}

fn prepend_toc(path: &Path) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Error reading {}", path.display()))?;

    let mut toc = String::new();
    for captures in HEADING_LINE.captures_iter(&content) {
        log::debug!("     {}", &captures[0]);
        let level = captures[1].len();
        let title = &captures[2];
        toc.push_str(&"  ".repeat(level - 1));
        toc.push_str(&format!("- [{}](#{})\n", title, slug(title)));
    }
    toc.push('\n');

    fs::write(path, format!("{toc}{content}"))
        .with_context(|| format!("Error rewriting {}", path.display()))
}

fn slug(title: &str) -> String {
    WHITESPACE_RUN
        .replace_all(&title.to_lowercase(), "-")
        .into_owned()
}

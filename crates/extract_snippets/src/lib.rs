// crates/extract_snippets/src/lib.rs

use anyhow::Result;
use normalize_snippet_content::normalize;
use parse_snippet_tags::{is_closing_tag, is_hide_end, is_hide_start, match_opening_tag};

/// A tagged block extracted from one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub title: String,
    pub module_name: String,
    /// 0-based index of the opening tag line in the source file.
    pub line: usize,
    /// Normalized body text, joined by newlines.
    pub content: String,
}

/// Produces the ordered snippets found in one file's content.
pub trait SnippetFinder {
    fn process(&self, content: &str) -> Result<Vec<Snippet>>;
}

/// Finder for sources that use `//` line comments.
pub struct JavaScriptSnippets;

impl SnippetFinder for JavaScriptSnippets {
    fn process(&self, content: &str) -> Result<Vec<Snippet>> {
        extract_snippets(content)
    }
}

// Transient per-snippet state. Completion consumes the whole value, so no
// field can leak into the next snippet.
struct OpenSnippet {
    title: String,
    module_name: String,
    start_line: usize,
    hiding: bool,
    lines: Vec<String>,
}

impl OpenSnippet {
    fn finish(self) -> Snippet {
        Snippet {
            content: normalize(&self.lines),
            title: self.title,
            module_name: self.module_name,
            line: self.start_line,
        }
    }
}

/// Scans `content` line by line and returns the snippets in the order their
/// closing tags appear.
///
/// Outside a snippet, only opening tags are significant. Inside one, a
/// closing tag finalizes the snippet, hide markers toggle a region whose
/// lines are discarded, and every other line is captured raw. A snippet
/// still open at end of input is silently dropped.
pub fn extract_snippets(content: &str) -> Result<Vec<Snippet>> {
    let mut snippets = Vec::new();
    let mut open: Option<OpenSnippet> = None;

    for (index, line) in content.lines().enumerate() {
        if open.is_some() && is_closing_tag(line) {
            let completed = open.take().expect("a snippet is open");
            snippets.push(completed.finish());
            continue;
        }
        match open.as_mut() {
            Some(current) => {
                if current.hiding {
                    if is_hide_end(line) {
                        current.hiding = false;
                    }
                } else if is_hide_start(line) {
                    current.hiding = true;
                } else {
                    current.lines.push(line.to_string());
                }
            }
            None => {
                if let Some(header) = match_opening_tag(line)? {
                    open = Some(OpenSnippet {
                        title: header.title,
                        module_name: header.module_name,
                        start_line: index,
                        hiding: false,
                        lines: Vec::new(),
                    });
                }
            }
        }
    }

    Ok(snippets)
}

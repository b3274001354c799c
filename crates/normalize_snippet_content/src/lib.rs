// crates/normalize_snippet_content/src/lib.rs

use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)//\s?(.*)").unwrap());

/// Strips the widest common column of leading whitespace from `lines`.
///
/// The indent is grown column by column from 0 while every line long enough
/// to reach the column has whitespace there; lines shorter than the final
/// indent are simply sliced to their own length.
pub fn strip_common_indent(lines: &[String]) -> Vec<String> {
    let mut indent = 0usize;
    if !lines.is_empty() {
        loop {
            let mut has_more_characters = false;
            let mut all_whitespace = true;
            for line in lines {
                if let Some(ch) = line.chars().nth(indent) {
                    has_more_characters = true;
                    if !ch.is_whitespace() {
                        all_whitespace = false;
                    }
                }
            }
            if all_whitespace && has_more_characters {
                indent += 1;
            } else {
                break;
            }
        }
    }
    lines
        .iter()
        .map(|line| line.chars().skip(indent).collect())
        .collect()
}

/// Removes one leading `//` marker (and at most one following space) from
/// each commented line, keeping its indentation. Lines without a marker,
/// such as blank lines, are returned verbatim.
pub fn strip_comment_markers(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| match COMMENT_LINE.captures(line) {
            Some(captures) => format!("{}{}", &captures[1], &captures[2]),
            None => line.clone(),
        })
        .collect()
}

/// Runs both normalization passes and joins the result with newlines.
pub fn normalize(lines: &[String]) -> String {
    strip_comment_markers(&strip_common_indent(lines)).join("\n")
}

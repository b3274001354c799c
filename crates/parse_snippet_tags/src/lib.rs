// crates/parse_snippet_tags/src/lib.rs

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors raised while parsing an opening snippet tag.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("Invalid snippet attribute '{0}'")]
    UnknownAttribute(String),
    #[error("Either title or module attribute of snippet not defined")]
    MissingRequiredAttribute,
}

/// Attributes declared on an opening snippet tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetHeader {
    pub title: String,
    pub module_name: String,
}

static OPENING_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*//\s*<snippet\s*").unwrap());
static ATTRIBUTE_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([A-Za-z0-9_]+)=(?:"([^"]*)"|'([^']*)')"#).unwrap());
static CLOSING_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*//\s*</snippet>\s*$").unwrap());
static HIDE_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*//\s*<hide>\s*$").unwrap());
static HIDE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*//\s*</hide>\s*$").unwrap());

/// Tests whether `line` opens a snippet and, if so, parses its attributes.
///
/// Returns `Ok(None)` for lines that are not opening tags at all. For an
/// opening tag, every `name="value"` (or `name='value'`) pair on the rest of
/// the line is consumed in one pass. Only `title` and `module` are legal
/// attribute names; `module` travels as `module_name` in the result.
///
/// # Errors
///
/// `TagError::UnknownAttribute` for any other attribute name, and
/// `TagError::MissingRequiredAttribute` when `title` or `module` is absent.
pub fn match_opening_tag(line: &str) -> Result<Option<SnippetHeader>, TagError> {
    if !OPENING_TAG.is_match(line) {
        return Ok(None);
    }
    let rest_of_line = OPENING_TAG.replace(line, "");

    let mut title: Option<String> = None;
    let mut module_name: Option<String> = None;
    for captures in ATTRIBUTE_PAIR.captures_iter(&rest_of_line) {
        let value = captures
            .get(2)
            .or_else(|| captures.get(3))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        match &captures[1] {
            "title" => title = Some(value),
            "module" => module_name = Some(value),
            other => return Err(TagError::UnknownAttribute(other.to_string())),
        }
    }

    match (title, module_name) {
        (Some(title), Some(module_name)) => Ok(Some(SnippetHeader { title, module_name })),
        _ => Err(TagError::MissingRequiredAttribute),
    }
}

/// True iff the trimmed line is exactly the snippet closing tag.
pub fn is_closing_tag(line: &str) -> bool {
    CLOSING_TAG.is_match(line)
}

/// True iff the trimmed line is exactly the hide-region opening marker.
pub fn is_hide_start(line: &str) -> bool {
    HIDE_START.is_match(line)
}

/// True iff the trimmed line is exactly the hide-region closing marker.
pub fn is_hide_end(line: &str) -> bool {
    HIDE_END.is_match(line)
}

// crates/aggregate_snippets/src/lib.rs

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use extract_snippets::{Snippet, SnippetFinder};
use list_source_files::list_files_recursive;
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*#.*$").unwrap());

/// Settings for one extraction run.
pub struct ExtractSettings {
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,
    pub source_files_regex: String,
    pub destination_extension: String,
    pub no_clean: bool,
}

/// Rebuilds the destination directory from the snippets found under the
/// source directory.
///
/// Unless `no_clean` is set, the destination is rebuilt from scratch. Every
/// file whose path matches `source_files_regex` is scanned with `finder`,
/// and each snippet is appended to
/// `<destination_dir>/<module_name>/HOW-TO.<destination_extension>`, with a
/// front-matter header written when that file is first created. Appends
/// happen immediately per snippet; a mid-run failure leaves the destination
/// partially populated.
pub fn extract(settings: &ExtractSettings, finder: &dyn SnippetFinder) -> Result<()> {
    setup_destination(settings)?;

    let pattern = Regex::new(&settings.source_files_regex).with_context(|| {
        format!(
            "Invalid source files regex '{}'",
            settings.source_files_regex
        )
    })?;

    println!("Scanning files:");
    for path in list_files_recursive(&settings.source_dir)? {
        if pattern.is_match(&path.to_string_lossy()) {
            extract_from_file(settings, finder, &path)?;
        }
    }
    Ok(())
}

fn setup_destination(settings: &ExtractSettings) -> Result<()> {
    clean_up_destination(settings)?;
    create_destination_dir(&settings.destination_dir)
}

fn clean_up_destination(settings: &ExtractSettings) -> Result<()> {
    let destination = &settings.destination_dir;
    if settings.no_clean || !destination.exists() {
        return Ok(());
    }
    println!("Cleaning up destination directory.");
    let entries = fs::read_dir(destination).with_context(|| {
        format!(
            "Error reading destination directory {}",
            destination.display()
        )
    })?;
    for entry in entries {
        let entry = entry.with_context(|| {
            format!(
                "Error reading destination directory {}",
                destination.display()
            )
        })?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if path.is_file() && matches_extension(&name, &settings.destination_extension) {
            println!("  Remove file: {}", name);
            fs::remove_file(&path)
                .with_context(|| format!("Error removing file {}", path.display()))?;
        }
    }
    // Removing the whole tree here is what lets a rebuild start from
    // nothing; module directories from the previous run would otherwise
    // keep collecting appended copies of the same snippets.
    println!("Remove destination directory.");
    fs::remove_dir_all(destination).with_context(|| {
        format!(
            "Error removing destination directory {}",
            destination.display()
        )
    })?;
    Ok(())
}

fn matches_extension(name: &str, extension: &str) -> bool {
    name.len() > extension.len() && name.ends_with(&format!(".{}", extension))
}

fn create_destination_dir(destination: &Path) -> Result<()> {
    if !destination.exists() {
        println!("Creating directory: {}", destination.display());
        fs::create_dir_all(destination)
            .with_context(|| format!("Error creating directory {}", destination.display()))?;
    }
    Ok(())
}

fn extract_from_file(
    settings: &ExtractSettings,
    finder: &dyn SnippetFinder,
    path: &Path,
) -> Result<()> {
    println!(" * {}", path.display());
    let content =
        fs::read_to_string(path).with_context(|| format!("Error reading {}", path.display()))?;
    let snippets = finder
        .process(&content)
        .with_context(|| format!("Error extracting snippets from {}", path.display()))?;
    for snippet in snippets {
        write_snippet(settings, &snippet)?;
    }
    Ok(())
}

fn write_snippet(settings: &ExtractSettings, snippet: &Snippet) -> Result<()> {
    println!("    - {}: {}", snippet.line, snippet.module_name);
    for heading in HEADING_LINE.find_iter(&snippet.content) {
        log::debug!("            {}", heading.as_str());
    }

    let module_dir = settings.destination_dir.join(&snippet.module_name);
    fs::create_dir_all(&module_dir)
        .with_context(|| format!("Error creating directory {}", module_dir.display()))?;
    let output_path = module_dir.join(format!("HOW-TO.{}", settings.destination_extension));

    // The header goes in exactly once, when the module file first appears.
    let is_new = !output_path.exists();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&output_path)
        .with_context(|| format!("Error opening {}", output_path.display()))?;
    if is_new {
        file.write_all(header(&snippet.title).as_bytes())
            .with_context(|| format!("Error writing header to {}", output_path.display()))?;
    }
    file.write_all(format!("{}\n", snippet.content).as_bytes())
        .with_context(|| format!("Error appending to {}", output_path.display()))?;
    Ok(())
}

fn header(title: &str) -> String {
    format!(
        "---\n\
         nav-title: \"{title} How-To\"\n\
         title: \"How-To\"\n\
         description: \"Examples for using {title}\"\n\
         ---\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract_snippets::JavaScriptSnippets;
    use tempfile::tempdir;

    fn settings(source: &Path, destination: &Path, no_clean: bool) -> ExtractSettings {
        ExtractSettings {
            source_dir: source.to_path_buf(),
            destination_dir: destination.to_path_buf(),
            source_files_regex: r"\.js$".to_string(),
            destination_extension: "md".to_string(),
            no_clean,
        }
    }

    const WIDGET_SOURCE: &str = "\
// <snippet title=\"Widget\" module=\"widgets\">
// console.log(\"hi\");
// </snippet>
";

    const WIDGET_PAGE: &str = "\
---
nav-title: \"Widget How-To\"
title: \"How-To\"
description: \"Examples for using Widget\"
---
console.log(\"hi\");
";

    #[test]
    fn test_extract_writes_header_and_content() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("out");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("widget.js"), WIDGET_SOURCE).unwrap();

        extract(&settings(&source, &destination, false), &JavaScriptSnippets).unwrap();

        let page = fs::read_to_string(destination.join("widgets/HOW-TO.md")).unwrap();
        assert_eq!(page, WIDGET_PAGE);
    }

    #[test]
    fn test_snippets_for_one_module_share_a_file() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("out");
        fs::create_dir_all(&source).unwrap();
        fs::write(
            source.join("widget.js"),
            "\
// <snippet title=\"Widget\" module=\"widgets\">
// first();
// </snippet>
// <snippet title=\"Other\" module=\"widgets\">
// second();
// </snippet>
",
        )
        .unwrap();

        extract(&settings(&source, &destination, false), &JavaScriptSnippets).unwrap();

        let page = fs::read_to_string(destination.join("widgets/HOW-TO.md")).unwrap();
        // Header uses the title of the snippet that created the file.
        assert!(page.starts_with("---\nnav-title: \"Widget How-To\"\n"));
        assert_eq!(page.matches("nav-title").count(), 1);
        let first = page.find("first();").unwrap();
        let second = page.find("second();").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_snippets_from_all_files_are_aggregated() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("out");
        fs::create_dir_all(source.join("nested")).unwrap();
        fs::write(source.join("a.js"), WIDGET_SOURCE).unwrap();
        fs::write(
            source.join("nested/b.js"),
            "\
// <snippet title=\"Widget\" module=\"widgets\">
// fromNested();
// </snippet>
",
        )
        .unwrap();

        extract(&settings(&source, &destination, false), &JavaScriptSnippets).unwrap();

        let page = fs::read_to_string(destination.join("widgets/HOW-TO.md")).unwrap();
        assert!(page.contains("console.log(\"hi\");"));
        assert!(page.contains("fromNested();"));
        assert_eq!(page.matches("nav-title").count(), 1);
    }

    #[test]
    fn test_non_matching_files_are_skipped() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("out");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("widget.ts"), WIDGET_SOURCE).unwrap();

        extract(&settings(&source, &destination, false), &JavaScriptSnippets).unwrap();

        assert!(!destination.join("widgets").exists());
    }

    #[test]
    fn test_stale_destination_file_is_removed() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("out");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&destination).unwrap();
        fs::write(source.join("widget.js"), WIDGET_SOURCE).unwrap();
        fs::write(destination.join("stale.md"), "old contents").unwrap();

        extract(&settings(&source, &destination, false), &JavaScriptSnippets).unwrap();

        assert!(!destination.join("stale.md").exists());
        assert!(destination.join("widgets/HOW-TO.md").exists());
    }

    #[test]
    fn test_no_clean_keeps_existing_destination_files() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("out");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&destination).unwrap();
        fs::write(source.join("widget.js"), WIDGET_SOURCE).unwrap();
        fs::write(destination.join("kept.md"), "old contents").unwrap();

        extract(&settings(&source, &destination, true), &JavaScriptSnippets).unwrap();

        assert_eq!(
            fs::read_to_string(destination.join("kept.md")).unwrap(),
            "old contents"
        );
        assert!(destination.join("widgets/HOW-TO.md").exists());
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("out");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("widget.js"), WIDGET_SOURCE).unwrap();

        let run = settings(&source, &destination, false);
        extract(&run, &JavaScriptSnippets).unwrap();
        let first = fs::read_to_string(destination.join("widgets/HOW-TO.md")).unwrap();
        extract(&run, &JavaScriptSnippets).unwrap();
        let second = fs::read_to_string(destination.join("widgets/HOW-TO.md")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_no_clean_rerun_appends() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("out");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("widget.js"), WIDGET_SOURCE).unwrap();

        let first_run = settings(&source, &destination, false);
        extract(&first_run, &JavaScriptSnippets).unwrap();
        let rerun = settings(&source, &destination, true);
        extract(&rerun, &JavaScriptSnippets).unwrap();

        let page = fs::read_to_string(destination.join("widgets/HOW-TO.md")).unwrap();
        assert_eq!(page.matches("console.log").count(), 2);
        assert_eq!(page.matches("nav-title").count(), 1);
    }

    #[test]
    fn test_bad_tag_aborts_and_keeps_earlier_output() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("out");
        fs::create_dir_all(&source).unwrap();
        // Directory listing order is not guaranteed, so make both orderings
        // meaningful: the good file lands in full or not at all.
        fs::write(source.join("good.js"), WIDGET_SOURCE).unwrap();
        fs::write(
            source.join("bad.js"),
            "// <snippet title=\"T\" module=\"m\" color=\"red\">\n// </snippet>\n",
        )
        .unwrap();

        let err = extract(&settings(&source, &destination, false), &JavaScriptSnippets)
            .expect_err("unknown attribute must abort the run");
        assert!(format!("{:#}", err).contains("Invalid snippet attribute 'color'"));
        // The module file from the bad file's snippets never appears.
        assert!(!destination.join("m").exists());
    }

    #[test]
    fn test_invalid_source_regex_is_fatal() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("out");
        fs::create_dir_all(&source).unwrap();

        let mut run = settings(&source, &destination, false);
        run.source_files_regex = "[".to_string();
        let err = extract(&run, &JavaScriptSnippets).expect_err("bad regex must fail");
        assert!(err.to_string().contains("Invalid source files regex"));
    }

    #[test]
    fn test_missing_source_dir_is_fatal() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("never-created");
        let destination = temp_dir.path().join("out");

        let err = extract(&settings(&source, &destination, false), &JavaScriptSnippets)
            .expect_err("missing source must fail");
        assert!(err.to_string().contains("Error listing files under"));
    }
}

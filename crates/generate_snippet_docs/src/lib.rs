// crates/generate_snippet_docs/src/lib.rs

use std::fs;
use std::path::PathBuf;

use aggregate_snippets::{extract, ExtractSettings};
use anyhow::{Context, Result};
use extract_snippets::JavaScriptSnippets;

/// Configuration for one documentation run, composed from the CLI.
pub struct ExtractorConfig {
    pub source: PathBuf,
    pub source_files_regex: String,
    pub destination: PathBuf,
    pub destination_files_extension: String,
    pub noclean: bool,
}

/// Extracts snippets into per-module HOW-TO pages, then prepends a table of
/// contents to every generated page.
pub fn run(config: ExtractorConfig) -> Result<()> {
    let settings = ExtractSettings {
        source_dir: config.source,
        destination_dir: config.destination.clone(),
        source_files_regex: config.source_files_regex,
        destination_extension: config.destination_files_extension.clone(),
        no_clean: config.noclean,
    };
    extract(&settings, &JavaScriptSnippets)?;

    println!("Building 'Table of Contents'.");
    build_snippet_toc::build(&config.destination, &config.destination_files_extension)?;
    // Generated pages live one level down, in their module directories.
    for entry in fs::read_dir(&config.destination).with_context(|| {
        format!(
            "Error reading destination directory {}",
            config.destination.display()
        )
    })? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            build_snippet_toc::build(&entry.path(), &config.destination_files_extension)?;
        }
    }
    Ok(())
}

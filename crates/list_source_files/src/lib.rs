// crates/list_source_files/src/lib.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Returns every file under `root`, depth-first, keeping the order in which
/// the filesystem reports each directory's entries.
///
/// # Errors
///
/// Any walk failure (missing root, unreadable directory) is fatal and is
/// returned with the root path as context.
pub fn list_files_recursive<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry =
            entry.with_context(|| format!("Error listing files under {}", root.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

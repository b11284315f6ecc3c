//! Member manifest discovery.
//!
//! Walks a workspace directory and yields every `package.json` accepted by
//! the compiled member patterns. The walk is synchronous (`walkdir`) and runs
//! on tokio's blocking pool.

use crate::error::Result;
use crate::patterns::CompiledPatterns;
use crate::MANIFEST_FILE_NAME;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directory names that are never descended into.
const PRUNED_DIRS: &[&str] = &["node_modules"];

/// Find member manifests below `base_dir`.
///
/// Results are in file-name order so repeated runs load members in the same
/// order.
///
/// # Errors
///
/// Returns `Error::Walk` if a directory cannot be read and `Error::Task` if
/// the blocking task fails.
pub async fn discover_members(base_dir: &Path, patterns: &CompiledPatterns) -> Result<Vec<PathBuf>> {
    let base_dir = base_dir.to_path_buf();
    let patterns = patterns.clone();
    tokio::task::spawn_blocking(move || walk(&base_dir, &patterns)).await?
}

fn walk(base_dir: &Path, patterns: &CompiledPatterns) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let walker = WalkDir::new(base_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_pruned(entry));

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() || entry.file_name() != MANIFEST_FILE_NAME {
            continue;
        }
        if patterns.accepts(entry.path()) {
            found.push(entry.into_path());
        }
    }

    debug!(
        base_dir = %base_dir.display(),
        count = found.len(),
        "Discovered member manifests"
    );
    Ok(found)
}

fn is_pruned(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || PRUNED_DIRS.contains(&name.as_ref())
}

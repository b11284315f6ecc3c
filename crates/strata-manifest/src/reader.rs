//! Async manifest reading.

use crate::error::{Error, Result};
use crate::record::ManifestRecord;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Read and parse one `package.json`.
///
/// # Errors
///
/// Returns `Error::NotFound` if the file does not exist, `Error::Io` for any
/// other read failure and `Error::Json` if the text is not a manifest.
///
/// # Examples
///
/// ```no_run
/// use strata_manifest::reader::read_manifest;
/// use std::path::Path;
///
/// # async fn example() -> strata_manifest::Result<()> {
/// let record = read_manifest(Path::new("package.json")).await?;
/// println!("{:?}", record.name);
/// # Ok(())
/// # }
/// ```
pub async fn read_manifest(path: &Path) -> Result<ManifestRecord> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|source| io_error(path, source))?;
    parse_manifest(path, &text)
}

/// Parse manifest text that was read from `path`.
///
/// # Errors
///
/// Returns `Error::Json` if the text is not a manifest.
pub fn parse_manifest(path: &Path, text: &str) -> Result<ManifestRecord> {
    serde_json::from_str(text).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve a manifest path to its canonical, absolute form.
///
/// Symlinks and `..` segments are resolved, so two spellings of the same
/// file produce the same key.
///
/// # Errors
///
/// Returns `Error::NotFound` if the path does not exist and `Error::Io`
/// otherwise.
pub async fn canonical_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path)
        .await
        .map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> Error {
    if source.kind() == ErrorKind::NotFound {
        Error::NotFound(path.to_path_buf())
    } else {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

//! Error types for strata-manifest operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for manifest reading and discovery.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error while reading a manifest or resolving its path.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Manifest text is not valid JSON for a manifest record.
    #[error("Invalid manifest {}: {source}", path.display())]
    Json {
        /// Path of the manifest.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A workspace member pattern is not a valid glob.
    #[error("Invalid workspace pattern '{pattern}': {source}")]
    Pattern {
        /// Pattern text as written in the manifest.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: glob::PatternError,
    },

    /// Directory walk failed during member discovery.
    #[error("Member discovery failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// A manifest that was asked for does not exist.
    #[error("Manifest not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Blocking discovery task panicked or was cancelled.
    #[error("Discovery task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A specialized Result type for strata-manifest operations.
pub type Result<T> = std::result::Result<T, Error>;

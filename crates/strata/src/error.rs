//! Error types for strata operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for workspace loading, categorization and rendering.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading, parsing or discovering a manifest failed.
    #[error(transparent)]
    Manifest(#[from] strata_manifest::Error),

    /// A manifest has no `name`; the workspace cannot be loaded partially.
    #[error("Manifest has no name: {}", .0.display())]
    MissingName(PathBuf),

    /// Two different manifests declare the same package name.
    #[error("Package '{name}' is declared by both {} and {}", first.display(), second.display())]
    DuplicatePackage {
        /// The duplicated name.
        name: String,
        /// Manifest loaded first.
        first: PathBuf,
        /// Manifest loaded second.
        second: PathBuf,
    },

    /// A category `matches` pattern is not a valid regular expression.
    #[error("Category '{rule}' has an invalid pattern: {source}")]
    InvalidPattern {
        /// Id of the offending rule.
        rule: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// Category configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A filter set names a package that is not in the workspace.
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// The diagram renderer failed.
    #[error("Render error: {0}")]
    Render(String),

    /// IO error while writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A specialized Result type for strata operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Manifest I/O for npm-style workspaces.
//!
//! This library reads `package.json` manifests, parses workspace member
//! patterns, and discovers member manifests on disk. The graph engine in the
//! `strata` crate loads everything through the [`ManifestSource`] seam.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod discovery;
pub mod error;
pub mod patterns;
pub mod reader;
pub mod record;
pub mod source;

pub use error::{Error, Result};
pub use patterns::{CompiledPatterns, MemberPatterns};
pub use record::ManifestRecord;
#[cfg(any(test, feature = "test-util"))]
pub use source::MemorySource;
pub use source::{FsSource, ManifestSource};

/// File name of a package manifest.
pub const MANIFEST_FILE_NAME: &str = "package.json";

//! The seam between the workspace graph builder and manifest storage.
//!
//! The builder only needs three things from storage: a canonical key for a
//! manifest path, the parsed record behind that key, and the member
//! manifests below a directory. [`FsSource`] answers them from disk;
//! [`MemorySource`] (feature `test-util`) answers them from a map.

use crate::discovery::discover_members;
use crate::error::Result;
use crate::patterns::MemberPatterns;
use crate::reader::{canonical_path, read_manifest};
use crate::record::ManifestRecord;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Where manifests come from.
///
/// Implementations must be `Send + Sync`: member manifests are loaded
/// concurrently through a shared reference.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Canonical form of `path`, used as the deduplication key.
    async fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Parse the manifest at a canonical path.
    async fn read(&self, path: &Path) -> Result<ManifestRecord>;

    /// Member manifests below `base_dir` selected by `patterns`.
    async fn discover(&self, base_dir: &Path, patterns: &MemberPatterns) -> Result<Vec<PathBuf>>;
}

/// Filesystem-backed manifest source.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl FsSource {
    /// Create a filesystem source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ManifestSource for FsSource {
    async fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        canonical_path(path).await
    }

    async fn read(&self, path: &Path) -> Result<ManifestRecord> {
        read_manifest(path).await
    }

    async fn discover(&self, base_dir: &Path, patterns: &MemberPatterns) -> Result<Vec<PathBuf>> {
        let compiled = patterns.compile(base_dir)?;
        discover_members(base_dir, &compiled).await
    }
}

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemorySource;

#[cfg(any(test, feature = "test-util"))]
mod memory {
    use super::{ManifestRecord, ManifestSource, MemberPatterns, Result};
    use crate::error::Error;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::{Component, Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory manifest source for tests.
    ///
    /// Paths are normalized lexically (`.` and `..` are folded), which stands
    /// in for filesystem canonicalization. Every successful `read` is counted
    /// per path so tests can assert that a manifest was loaded once.
    #[derive(Debug, Default)]
    pub struct MemorySource {
        manifests: HashMap<PathBuf, ManifestRecord>,
        reads: Mutex<HashMap<PathBuf, usize>>,
        total_reads: AtomicUsize,
    }

    impl MemorySource {
        /// Create an empty source.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a manifest at `path`.
        pub fn insert(&mut self, path: impl AsRef<Path>, record: ManifestRecord) {
            self.manifests.insert(normalize(path.as_ref()), record);
        }

        /// Builder form of [`insert`](Self::insert).
        #[must_use]
        pub fn with(mut self, path: impl AsRef<Path>, record: ManifestRecord) -> Self {
            self.insert(path, record);
            self
        }

        /// Number of reads of the manifest at `path`.
        #[must_use]
        pub fn read_count(&self, path: impl AsRef<Path>) -> usize {
            let reads = self
                .reads
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            reads.get(&normalize(path.as_ref())).copied().unwrap_or(0)
        }

        /// Number of reads across all manifests.
        #[must_use]
        pub fn total_reads(&self) -> usize {
            self.total_reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ManifestSource for MemorySource {
        async fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
            let normalized = normalize(path);
            if self.manifests.contains_key(&normalized) {
                Ok(normalized)
            } else {
                Err(Error::NotFound(path.to_path_buf()))
            }
        }

        async fn read(&self, path: &Path) -> Result<ManifestRecord> {
            let normalized = normalize(path);
            let record = self
                .manifests
                .get(&normalized)
                .cloned()
                .ok_or_else(|| Error::NotFound(path.to_path_buf()))?;

            self.total_reads.fetch_add(1, Ordering::SeqCst);
            let mut reads = self
                .reads
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            *reads.entry(normalized).or_insert(0) += 1;
            Ok(record)
        }

        async fn discover(
            &self,
            base_dir: &Path,
            patterns: &MemberPatterns,
        ) -> Result<Vec<PathBuf>> {
            let base_dir = normalize(base_dir);
            let compiled = patterns.compile(&base_dir)?;
            let mut found: Vec<PathBuf> = self
                .manifests
                .keys()
                .filter(|path| path.starts_with(&base_dir) && compiled.accepts(path))
                .cloned()
                .collect();
            found.sort();
            Ok(found)
        }
    }

    fn normalize(path: &Path) -> PathBuf {
        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other.as_os_str()),
            }
        }
        normalized
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn canonicalize_folds_dot_segments() {
            let source = MemorySource::new().with("/repo/a/package.json", ManifestRecord::named("a"));
            let canonical = source
                .canonicalize(Path::new("/repo/b/../a/./package.json"))
                .await
                .unwrap();
            assert_eq!(canonical, PathBuf::from("/repo/a/package.json"));
        }

        #[tokio::test]
        async fn read_counts_per_path() {
            let source = MemorySource::new().with("/repo/a/package.json", ManifestRecord::named("a"));
            source.read(Path::new("/repo/a/package.json")).await.unwrap();
            source.read(Path::new("/repo/./a/package.json")).await.unwrap();
            assert_eq!(source.read_count("/repo/a/package.json"), 2);
            assert_eq!(source.total_reads(), 2);
        }

        #[tokio::test]
        async fn discover_filters_by_pattern() {
            let source = MemorySource::new()
                .with("/repo/package.json", ManifestRecord::named("root"))
                .with("/repo/packages/b/package.json", ManifestRecord::named("b"))
                .with("/repo/packages/a/package.json", ManifestRecord::named("a"))
                .with("/elsewhere/packages/c/package.json", ManifestRecord::named("c"));

            let found = source
                .discover(Path::new("/repo"), &MemberPatterns::parse(&["packages/*"]))
                .await
                .unwrap();
            assert_eq!(
                found,
                vec![
                    PathBuf::from("/repo/packages/a/package.json"),
                    PathBuf::from("/repo/packages/b/package.json"),
                ]
            );
        }

        #[tokio::test]
        async fn unknown_path_is_not_found() {
            let source = MemorySource::new();
            let err = source
                .canonicalize(Path::new("/repo/package.json"))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::NotFound(_)));
        }
    }
}

//! Package graph builder.
//!
//! Loading the root manifest is deep: its member patterns are expanded and
//! every member manifest is loaded, concurrently. Loading a member is
//! shallow: only its name, version, visibility and dependency names are
//! used, even if it declares workspaces of its own.
//!
//! Every load goes through a [`LoadContext`], which keys manifests by
//! canonical path and initializes each key at most once. Concurrent loads of
//! the same manifest share one [`LoadedManifest`].

use crate::domain::{Package, Workspace};
use crate::error::{Error, Result};
use futures::future::try_join_all;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strata_manifest::{ManifestRecord, ManifestSource, MemberPatterns};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

/// A manifest that has been read and has a name.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedManifest {
    /// Canonical manifest path (the cache key).
    pub path: PathBuf,
    /// Package name.
    pub name: String,
    /// The parsed record.
    pub record: ManifestRecord,
}

impl LoadedManifest {
    /// Directory holding the manifest.
    #[must_use]
    pub fn dir(&self) -> PathBuf {
        self.path.parent().map_or_else(PathBuf::new, Path::to_path_buf)
    }

    fn to_package(&self, root_dir: &Path) -> Package {
        let mut package = Package::new(self.name.clone(), relative_location(&self.dir(), root_dir))
            .with_private(self.record.is_private())
            .declaring(self.record.dependency_names());
        package.version.clone_from(&self.record.version);
        package.manifest_path.clone_from(&self.path);
        package
    }
}

type Slot = Arc<OnceCell<Arc<LoadedManifest>>>;

/// Shared cache for one workspace load.
pub struct LoadContext<'s> {
    source: &'s dyn ManifestSource,
    cache: Mutex<HashMap<PathBuf, Slot>>,
}

impl<'s> LoadContext<'s> {
    /// Create an empty context reading through `source`.
    #[must_use]
    pub fn new(source: &'s dyn ManifestSource) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Load the manifest at `path`, or return the entry already loaded for
    /// the same canonical path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Manifest` if the manifest cannot be resolved or read
    /// and `Error::MissingName` if it has no `name`.
    pub async fn load(&self, path: &Path) -> Result<Arc<LoadedManifest>> {
        let canonical = self.source.canonicalize(path).await?;
        let slot = {
            let mut cache = self.cache.lock().await;
            Arc::clone(cache.entry(canonical.clone()).or_default())
        };

        let loaded = slot
            .get_or_try_init(|| async {
                debug!(path = %canonical.display(), "Reading manifest");
                let record = self.source.read(&canonical).await?;
                let name = record
                    .name
                    .clone()
                    .ok_or_else(|| Error::MissingName(canonical.clone()))?;
                Ok::<_, Error>(Arc::new(LoadedManifest {
                    path: canonical.clone(),
                    name,
                    record,
                }))
            })
            .await?;

        Ok(Arc::clone(loaded))
    }

    /// Number of distinct canonical paths requested so far.
    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// True when nothing has been requested yet.
    pub async fn is_empty(&self) -> bool {
        self.cache.lock().await.is_empty()
    }
}

/// Load a workspace from its root manifest.
///
/// # Errors
///
/// Any failure is fatal: an unreadable or nameless manifest anywhere in the
/// workspace aborts the load, as does a name declared by two manifests.
pub async fn load_workspace(source: &dyn ManifestSource, root_manifest: &Path) -> Result<Workspace> {
    let context = LoadContext::new(source);
    let root = context.load(root_manifest).await?;
    let root_dir = root.dir();

    let patterns = MemberPatterns::parse(root.record.member_patterns());
    let member_paths = if patterns.is_empty() {
        Vec::new()
    } else {
        source.discover(&root_dir, &patterns).await?
    };
    debug!(
        root = %root.path.display(),
        candidates = member_paths.len(),
        "Loading workspace members"
    );

    let loaded = try_join_all(member_paths.iter().map(|path| context.load(path))).await?;

    let mut seen: HashSet<PathBuf> = HashSet::from([root.path.clone()]);
    let members: Vec<Package> = loaded
        .iter()
        .filter(|manifest| seen.insert(manifest.path.clone()))
        .map(|manifest| manifest.to_package(&root_dir))
        .collect();

    info!(
        root = %root.name,
        members = members.len(),
        "Loaded workspace"
    );
    Workspace::new(root.to_package(&root_dir), members)
}

fn relative_location(dir: &Path, root_dir: &Path) -> String {
    match dir.strip_prefix(root_dir) {
        Ok(relative) => relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => dir.to_string_lossy().into_owned(),
    }
}

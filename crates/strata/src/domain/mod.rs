//! Domain types for the workspace graph.
//!
//! A [`Workspace`] owns its root [`Package`] and every member package. The
//! ownership tree is strictly root → members. Dependency edges between
//! members are names resolved through the workspace's lookup table, never
//! references between packages, so mutually dependent packages are just two
//! entries naming each other.

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// One workspace package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    /// Package name, unique within the workspace.
    pub name: String,

    /// Manifest directory relative to the workspace root, `/`-separated.
    /// Used as the sort key when ordering diagram nodes.
    pub location: String,

    /// Declared version.
    pub version: Option<String>,

    /// Whether the manifest is marked private.
    pub is_private: bool,

    /// Every dependency and dev-dependency name the manifest declares,
    /// including packages outside the workspace.
    pub declared: BTreeSet<String>,

    /// Workspace packages this package depends on.
    pub requires: BTreeSet<String>,

    /// Workspace packages that depend on this package.
    pub needed_by: BTreeSet<String>,

    /// Fill color assigned by categorization.
    pub fill: Option<String>,

    /// Base name of the diagram this package links to, assigned by
    /// partitioning.
    pub filename_base: String,

    /// Canonical path of the manifest this package was loaded from.
    #[serde(skip)]
    pub manifest_path: PathBuf,
}

impl Package {
    /// Create a package with no dependencies.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            version: None,
            is_private: false,
            declared: BTreeSet::new(),
            requires: BTreeSet::new(),
            needed_by: BTreeSet::new(),
            fill: None,
            filename_base: String::new(),
            manifest_path: PathBuf::new(),
        }
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the private flag.
    #[must_use]
    pub fn with_private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }

    /// Add declared dependency names.
    #[must_use]
    pub fn declaring<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declared.extend(names.into_iter().map(Into::into));
        self
    }

    /// Multi-line diagram label: name, version and location.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.version {
            Some(version) => format!("{}\nv{}\n{}", self.name, version, self.location),
            None => format!("{}\n{}", self.name, self.location),
        }
    }

    /// Fresh presentation node; its children can be trimmed without touching
    /// this package.
    #[must_use]
    pub fn node(&self) -> Node {
        Node {
            id: self.name.clone(),
            sort_key: self.location.clone(),
            children: self.requires.clone(),
        }
    }
}

/// Presentation view of a package for one diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Package name.
    pub id: String,
    /// Ordering key (the package location).
    pub sort_key: String,
    /// Names this node points at. No iteration order may be relied on for
    /// layout; ordering code sorts on `sort_key` explicitly.
    pub children: BTreeSet<String>,
}

/// The loaded workspace: root package plus members keyed by name.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: Package,
    packages: BTreeMap<String, Package>,
}

impl Workspace {
    /// Assemble a workspace and resolve dependency edges between members.
    ///
    /// For each member, `requires` becomes its declared names restricted to
    /// other member names, and every resolved edge is mirrored into the
    /// target's `needed_by`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicatePackage` if two members share a name.
    pub fn new(root: Package, members: impl IntoIterator<Item = Package>) -> Result<Self> {
        let mut packages: BTreeMap<String, Package> = BTreeMap::new();
        for member in members {
            if let Some(existing) = packages.get(&member.name) {
                return Err(Error::DuplicatePackage {
                    name: member.name.clone(),
                    first: existing.manifest_path.clone(),
                    second: member.manifest_path,
                });
            }
            packages.insert(member.name.clone(), member);
        }

        let mut workspace = Self { root, packages };
        workspace.link();
        Ok(workspace)
    }

    fn link(&mut self) {
        let known: BTreeSet<String> = self.packages.keys().cloned().collect();
        let mut edges: Vec<(String, String)> = Vec::new();

        for package in self.packages.values_mut() {
            package.requires = package
                .declared
                .iter()
                .filter(|name| *name != &package.name && known.contains(*name))
                .cloned()
                .collect();
            package.needed_by.clear();
            edges.extend(
                package
                    .requires
                    .iter()
                    .map(|target| (target.clone(), package.name.clone())),
            );
        }

        for (target, dependent) in edges {
            if let Some(package) = self.packages.get_mut(&target) {
                package.needed_by.insert(dependent);
            }
        }
    }

    /// The root package (owner of all members, not a graph node).
    #[must_use]
    pub fn root(&self) -> &Package {
        &self.root
    }

    /// Member packages keyed by name.
    #[must_use]
    pub fn packages(&self) -> &BTreeMap<String, Package> {
        &self.packages
    }

    /// Member packages in name order.
    pub fn members(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// Mutable member packages in name order.
    pub fn members_mut(&mut self) -> impl Iterator<Item = &mut Package> {
        self.packages.values_mut()
    }

    /// Look up a member by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Every member name.
    #[must_use]
    pub fn names(&self) -> BTreeSet<String> {
        self.packages.keys().cloned().collect()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// True when the workspace has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

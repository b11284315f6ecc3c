//! The `package.json` record.
//!
//! Only the fields the workspace graph needs are modelled; everything else in
//! a manifest is ignored during deserialization.

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// One parsed `package.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRecord {
    /// Package name. Required for the manifest to become a package.
    pub name: Option<String>,

    /// Package version.
    pub version: Option<String>,

    /// Whether the package is marked `"private": true`.
    pub private: Option<bool>,

    /// Workspace member declaration (only honored on the workspace root).
    pub workspaces: Option<Workspaces>,

    /// Runtime dependencies, keyed by package name.
    #[serde(default)]
    pub dependencies: BTreeMap<String, Value>,

    /// Development dependencies, keyed by package name.
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, Value>,
}

/// The `workspaces` field in either of its two accepted layouts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Workspaces {
    /// `"workspaces": ["packages/*"]`
    Patterns(Vec<String>),

    /// `"workspaces": { "packages": ["packages/*"] }`
    Config {
        /// Member patterns.
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl Workspaces {
    /// Member patterns regardless of layout.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        match self {
            Self::Patterns(patterns) | Self::Config { packages: patterns } => patterns,
        }
    }
}

impl ManifestRecord {
    /// Create a record with only a name, for building manifests in code.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
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
    pub fn with_private(mut self, private: bool) -> Self {
        self.private = Some(private);
        self
    }

    /// Add runtime dependencies (versions are irrelevant and left as `"*"`).
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.dependencies
                .insert(name.into(), Value::String("*".to_string()));
        }
        self
    }

    /// Add development dependencies.
    #[must_use]
    pub fn with_dev_dependencies<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.dev_dependencies
                .insert(name.into(), Value::String("*".to_string()));
        }
        self
    }

    /// Declare workspace member patterns.
    #[must_use]
    pub fn with_workspaces<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.workspaces = Some(Workspaces::Config {
            packages: patterns.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// `private` with the npm default of `false`.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.private.unwrap_or(false)
    }

    /// Declared workspace member patterns, empty when absent.
    #[must_use]
    pub fn member_patterns(&self) -> &[String] {
        match &self.workspaces {
            Some(workspaces) => workspaces.patterns(),
            None => &[],
        }
    }

    /// Names of all dependencies and dev-dependencies.
    #[must_use]
    pub fn dependency_names(&self) -> BTreeSet<String> {
        self.dependencies
            .keys()
            .chain(self.dev_dependencies.keys())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_manifest() {
        let record: ManifestRecord = serde_json::from_str(
            r#"{
                "name": "@scope/app",
                "version": "1.2.3",
                "private": true,
                "scripts": { "build": "tsc" },
                "dependencies": { "@scope/lib": "workspace:*", "left-pad": "^1.0.0" },
                "devDependencies": { "@scope/test-utils": "*" }
            }"#,
        )
        .unwrap();

        assert_eq!(record.name.as_deref(), Some("@scope/app"));
        assert_eq!(record.version.as_deref(), Some("1.2.3"));
        assert!(record.is_private());
        assert_eq!(
            record.dependency_names().into_iter().collect::<Vec<_>>(),
            vec!["@scope/lib", "@scope/test-utils", "left-pad"]
        );
    }

    #[test]
    fn missing_fields_use_defaults() {
        let record: ManifestRecord = serde_json::from_str("{}").unwrap();
        assert!(record.name.is_none());
        assert!(!record.is_private());
        assert!(record.member_patterns().is_empty());
        assert!(record.dependency_names().is_empty());
    }

    #[test]
    fn workspaces_object_layout() {
        let record: ManifestRecord =
            serde_json::from_str(r#"{ "name": "root", "workspaces": { "packages": ["a/*", "!a/x"] } }"#)
                .unwrap();
        assert_eq!(record.member_patterns(), ["a/*", "!a/x"]);
    }

    #[test]
    fn workspaces_list_layout() {
        let record: ManifestRecord =
            serde_json::from_str(r#"{ "name": "root", "workspaces": ["packages/*"] }"#).unwrap();
        assert_eq!(record.member_patterns(), ["packages/*"]);
    }

    #[test]
    fn builder_helpers() {
        let record = ManifestRecord::named("a")
            .with_version("0.1.0")
            .with_private(true)
            .with_dependencies(["b"])
            .with_dev_dependencies(["c"]);
        assert_eq!(record.name.as_deref(), Some("a"));
        assert!(record.is_private());
        assert_eq!(record.dependency_names().len(), 2);
    }
}

//! Workspace member patterns.
//!
//! The root manifest lists members as glob patterns relative to the root
//! directory. Entries prefixed with `!` exclude matching members; exclusions
//! always win over inclusions.

use crate::error::{Error, Result};
use crate::MANIFEST_FILE_NAME;
use glob::{MatchOptions, Pattern};
use std::path::Path;

/// Options shared by every member pattern: `*` stays inside one directory
/// level, `**` crosses levels.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Member patterns split into inclusions and exclusions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPatterns {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl MemberPatterns {
    /// Split raw `workspaces.packages` entries.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Self {
        let mut patterns = Self::default();
        for entry in entries {
            let entry = entry.as_ref().trim();
            match entry.strip_prefix('!') {
                Some(excluded) => patterns.exclude.push(normalize(excluded)),
                None => patterns.include.push(normalize(entry)),
            }
        }
        patterns
    }

    /// Inclusion patterns, without decoration.
    #[must_use]
    pub fn includes(&self) -> &[String] {
        &self.include
    }

    /// Exclusion patterns, with the `!` prefix removed.
    #[must_use]
    pub fn excludes(&self) -> &[String] {
        &self.exclude
    }

    /// True when nothing can be included.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include.is_empty()
    }

    /// Anchor every pattern at `base_dir/<pattern>/package.json`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Pattern` if any entry is not a valid glob.
    pub fn compile(&self, base_dir: &Path) -> Result<CompiledPatterns> {
        let base = Pattern::escape(base_dir.to_string_lossy().trim_end_matches('/'));
        let anchor = |pattern: &String| -> Result<Pattern> {
            let full = if pattern.is_empty() {
                format!("{base}/{MANIFEST_FILE_NAME}")
            } else {
                format!("{base}/{pattern}/{MANIFEST_FILE_NAME}")
            };
            Pattern::new(&full).map_err(|source| Error::Pattern {
                pattern: pattern.clone(),
                source,
            })
        };

        Ok(CompiledPatterns {
            include: self.include.iter().map(anchor).collect::<Result<_>>()?,
            exclude: self.exclude.iter().map(anchor).collect::<Result<_>>()?,
        })
    }
}

/// Member patterns anchored at a directory, ready for matching.
#[derive(Debug, Clone, Default)]
pub struct CompiledPatterns {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl CompiledPatterns {
    /// Whether `manifest_path` names a member manifest.
    #[must_use]
    pub fn accepts(&self, manifest_path: &Path) -> bool {
        if self.excludes(manifest_path) {
            return false;
        }
        self.include
            .iter()
            .any(|pattern| pattern.matches_path_with(manifest_path, MATCH_OPTIONS))
    }

    /// Whether `path` is covered by an exclusion.
    #[must_use]
    pub fn excludes(&self, path: &Path) -> bool {
        self.exclude
            .iter()
            .any(|pattern| pattern.matches_path_with(path, MATCH_OPTIONS))
    }
}

fn normalize(pattern: &str) -> String {
    let mut pattern = pattern;
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest;
    }
    let pattern = pattern.trim_end_matches('/');
    if pattern == "." {
        String::new()
    } else {
        pattern.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn manifest(rel: &str) -> PathBuf {
        PathBuf::from("/repo").join(rel).join(MANIFEST_FILE_NAME)
    }

    #[test]
    fn parse_splits_exclusions() {
        let patterns = MemberPatterns::parse(&["packages/*", "!packages/legacy", "./tools/"]);
        assert_eq!(patterns.includes(), ["packages/*", "tools"]);
        assert_eq!(patterns.excludes(), ["packages/legacy"]);
        assert!(!patterns.is_empty());
    }

    #[test]
    fn only_exclusions_is_empty() {
        let patterns = MemberPatterns::parse(&["!packages/legacy"]);
        assert!(patterns.is_empty());
    }

    #[test]
    fn star_does_not_cross_directories() {
        let compiled = MemberPatterns::parse(&["packages/*"])
            .compile(Path::new("/repo"))
            .unwrap();
        assert!(compiled.accepts(&manifest("packages/a")));
        assert!(!compiled.accepts(&manifest("packages/a/nested")));
        assert!(!compiled.accepts(&manifest("other/a")));
    }

    #[test]
    fn globstar_crosses_directories() {
        let compiled = MemberPatterns::parse(&["apps/**"])
            .compile(Path::new("/repo"))
            .unwrap();
        assert!(compiled.accepts(&manifest("apps/web")));
        assert!(compiled.accepts(&manifest("apps/web/admin")));
    }

    #[test]
    fn exclusion_wins() {
        let compiled = MemberPatterns::parse(&["packages/*", "!packages/legacy"])
            .compile(Path::new("/repo"))
            .unwrap();
        assert!(compiled.accepts(&manifest("packages/current")));
        assert!(!compiled.accepts(&manifest("packages/legacy")));
    }

    #[test]
    fn base_dir_metacharacters_are_literal() {
        let compiled = MemberPatterns::parse(&["packages/*"])
            .compile(Path::new("/repo[1]"))
            .unwrap();
        assert!(compiled.accepts(Path::new("/repo[1]/packages/a/package.json")));
        assert!(!compiled.accepts(Path::new("/repo1/packages/a/package.json")));
    }

    #[test]
    fn invalid_glob_is_rejected() {
        let err = MemberPatterns::parse(&["packages/[a"])
            .compile(Path::new("/repo"))
            .unwrap_err();
        assert!(matches!(err, Error::Pattern { ref pattern, .. } if pattern == "packages/[a"));
    }
}

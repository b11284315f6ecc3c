//! Category configuration file.
//!
//! ```yaml
//! rules:
//!   - id: apps
//!     matches: "^@acme/app-"
//!     fill: "#1f77b4"
//!     group: true
//!   - id: internal
//!     private: true
//! order: [matches, [private, hard], reach]
//! ```
//!
//! JSON with the same shape is accepted; the format is chosen by extension.

use super::matcher::{FieldMatcher, MatcherChain, MatcherKind, Strength};
use super::rule::{CategoryRule, RawCategoryRule};
use crate::domain::{Package, Workspace};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// One entry of the matcher ordering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OrderEntry {
    /// Bare matcher name; soft.
    Name(String),
    /// Matcher name with explicit strength.
    Pair(String, Strength),
}

impl OrderEntry {
    fn to_matcher(&self) -> Option<FieldMatcher> {
        let (name, strength) = match self {
            Self::Name(name) => (name, Strength::Soft),
            Self::Pair(name, strength) => (name, *strength),
        };
        match name.parse::<MatcherKind>() {
            Ok(kind) => Some(FieldMatcher::new(kind, strength)),
            Err(reason) => {
                debug!(matcher = %name, %reason, "Dropping matcher from chain");
                None
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawCategoryConfig {
    #[serde(default)]
    rules: Vec<RawCategoryRule>,
    #[serde(default, alias = "matcher")]
    order: Option<Vec<OrderEntry>>,
}

/// Ordered category rules plus the matcher chain applied to each.
#[derive(Debug, Clone, Default)]
pub struct CategoryConfig {
    /// Rules in declaration order.
    pub rules: Vec<CategoryRule>,
    /// Matcher chain.
    pub chain: MatcherChain,
}

impl CategoryConfig {
    /// Create a configuration from compiled rules.
    #[must_use]
    pub fn new(rules: Vec<CategoryRule>, chain: MatcherChain) -> Self {
        Self { rules, chain }
    }

    /// Build a matcher chain from configured entries, dropping unknown names.
    #[must_use]
    pub fn chain_from(entries: &[OrderEntry]) -> MatcherChain {
        MatcherChain::new(entries.iter().filter_map(OrderEntry::to_matcher).collect())
    }

    /// Load a configuration file: YAML for `.yaml`/`.yml`, JSON otherwise.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, `Error::Config` if it
    /// cannot be parsed, and `Error::InvalidPattern` for a bad regex.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let config = if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
        .map_err(|e| match e {
            Error::Config(message) => Error::Config(format!("{}: {message}", path.display())),
            other => other,
        })?;

        debug!(
            path = %path.display(),
            rules = config.rules.len(),
            matchers = config.chain.matchers().len(),
            "Loaded category configuration"
        );
        for rule in &config.rules {
            debug!(
                legend = rule.legend_text(),
                id = %rule.id,
                fill = ?rule.fill,
                matches = ?rule.matches.as_ref().map(regex::Regex::as_str),
                private = ?rule.private,
                reach = ?rule.reach,
                "Category rule"
            );
        }
        Ok(config)
    }

    /// Load `path` if given, otherwise an empty configuration.
    ///
    /// # Errors
    ///
    /// See [`CategoryConfig::load`].
    pub async fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path).await,
            None => Ok(Self::default()),
        }
    }

    /// Parse JSON configuration text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for malformed JSON and `Error::InvalidPattern`
    /// for a bad regex.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawCategoryConfig =
            serde_json::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Parse YAML configuration text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for malformed YAML and `Error::InvalidPattern`
    /// for a bad regex.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let raw: RawCategoryConfig =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawCategoryConfig) -> Result<Self> {
        let rules = raw
            .rules
            .into_iter()
            .map(CategoryRule::try_from)
            .collect::<Result<Vec<_>>>()?;
        let chain = raw
            .order
            .as_deref()
            .map_or_else(MatcherChain::default, Self::chain_from);
        Ok(Self { rules, chain })
    }

    /// First rule whose matcher chain accepts `package`.
    #[must_use]
    pub fn match_category(&self, package: &Package) -> Option<&CategoryRule> {
        self.rules
            .iter()
            .find(|rule| self.chain.matches(package, rule))
    }

    /// Assign every member's fill color from its category.
    pub fn paint(&self, workspace: &mut Workspace) {
        let fills: Vec<(String, Option<String>)> = workspace
            .members()
            .map(|package| {
                let fill = self
                    .match_category(package)
                    .and_then(|rule| rule.fill.clone());
                (package.name.clone(), fill)
            })
            .collect();

        for (package, (name, fill)) in workspace.members_mut().zip(fills) {
            debug_assert_eq!(package.name, name);
            package.fill = fill;
        }
    }
}

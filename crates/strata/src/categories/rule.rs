//! Category rules.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Constraint on how many packages a package is directly related to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReachRule {
    /// `true`: at least one relationship. `false`: none at all.
    Any(bool),
    /// Exactly this many distinct related packages.
    Exactly(usize),
}

impl ReachRule {
    /// Whether `count` related packages satisfy the rule.
    #[must_use]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Any(true) => count > 0,
            Self::Any(false) => count == 0,
            Self::Exactly(expected) => count == expected,
        }
    }
}

/// How packages of a category are grouped into diagrams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupRule {
    /// `true` groups under the category id, `false` keeps packages separate.
    Flag(bool),
    /// Group under an explicit name (several categories may share it).
    Named(String),
}

/// A category rule as written in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCategoryRule {
    /// Category id.
    pub id: String,
    /// Regular expression searched for in the package name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<String>,
    /// Expected visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// Expected relationship count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reach: Option<ReachRule>,
    /// Legend text (defaults to the id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<String>,
    /// Fill color, `#rrggbb`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupRule>,
}

/// A compiled category rule.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    /// Category id.
    pub id: String,
    /// Name pattern.
    pub matches: Option<Regex>,
    /// Expected visibility.
    pub private: Option<bool>,
    /// Expected relationship count.
    pub reach: Option<ReachRule>,
    /// Legend text.
    pub legend: Option<String>,
    /// Fill color.
    pub fill: Option<String>,
    /// Grouping.
    pub group: Option<GroupRule>,
}

impl CategoryRule {
    /// Rule with only an id; it constrains nothing and matches everything.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            matches: None,
            private: None,
            reach: None,
            legend: None,
            fill: None,
            group: None,
        }
    }

    /// Constrain the name. `pattern` uses `regex` syntax, which has no
    /// look-around or backreferences.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` if `pattern` is not a valid regex.
    pub fn with_matches(mut self, pattern: &str) -> Result<Self> {
        self.matches = Some(compile(&self.id, pattern)?);
        Ok(self)
    }

    /// Constrain visibility.
    #[must_use]
    pub fn with_private(mut self, private: bool) -> Self {
        self.private = Some(private);
        self
    }

    /// Constrain the relationship count.
    #[must_use]
    pub fn with_reach(mut self, reach: ReachRule) -> Self {
        self.reach = Some(reach);
        self
    }

    /// Set grouping.
    #[must_use]
    pub fn with_group(mut self, group: GroupRule) -> Self {
        self.group = Some(group);
        self
    }

    /// Set the fill color.
    #[must_use]
    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Set the legend text.
    #[must_use]
    pub fn with_legend(mut self, legend: impl Into<String>) -> Self {
        self.legend = Some(legend.into());
        self
    }

    /// The diagram group packages of this category belong to, if any.
    ///
    /// An empty group name is treated as no group.
    #[must_use]
    pub fn group_key(&self) -> Option<&str> {
        match &self.group {
            Some(GroupRule::Flag(true)) => Some(&self.id),
            Some(GroupRule::Named(name)) if !name.is_empty() => Some(name),
            _ => None,
        }
    }

    /// Text shown in the legend.
    #[must_use]
    pub fn legend_text(&self) -> &str {
        self.legend.as_deref().unwrap_or(&self.id)
    }
}

impl TryFrom<RawCategoryRule> for CategoryRule {
    type Error = Error;

    fn try_from(raw: RawCategoryRule) -> Result<Self> {
        let matches = raw
            .matches
            .as_deref()
            .map(|pattern| compile(&raw.id, pattern))
            .transpose()?;
        Ok(Self {
            id: raw.id,
            matches,
            private: raw.private,
            reach: raw.reach,
            legend: raw.legend,
            fill: raw.fill,
            group: raw.group,
        })
    }
}

fn compile(rule: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        rule: rule.to_string(),
        source,
    })
}

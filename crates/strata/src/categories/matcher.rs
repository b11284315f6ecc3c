//! Tri-state field matchers.
//!
//! Each matcher inspects one rule field against a package and reports
//! [`MatchOutcome::Match`], [`MatchOutcome::NoMatch`] or
//! [`MatchOutcome::Indifferent`]. A chain evaluates its matchers in order
//! and stops at the first decisive outcome. A chain where every matcher is
//! indifferent accepts the package.
//!
//! Strength decides what a satisfied constraint means: a hard matcher turns
//! it into an immediate match, a soft matcher stays indifferent and lets the
//! rest of the chain decide. A violated constraint is always a non-match.

use super::rule::CategoryRule;
use crate::domain::Package;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result of evaluating one matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Decisively matches.
    Match,
    /// Decisively does not match.
    NoMatch,
    /// No opinion.
    Indifferent,
}

/// How a satisfied constraint is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    /// A satisfied constraint decides the rule matches.
    Hard,
    /// A satisfied constraint defers to the next matcher.
    #[default]
    Soft,
}

/// Which rule field a matcher checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    /// `matches`: regex search in the package name.
    Matches,
    /// `private`: the package visibility.
    Private,
    /// `reach`: the number of directly related packages.
    Reach,
}

impl MatcherKind {
    /// Configuration name of this matcher.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Matches => "matches",
            Self::Private => "private",
            Self::Reach => "reach",
        }
    }
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatcherKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "matches" => Ok(Self::Matches),
            "private" => Ok(Self::Private),
            "reach" => Ok(Self::Reach),
            other => Err(format!("unknown matcher '{other}'")),
        }
    }
}

/// One step of a matcher chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMatcher {
    /// Field checked.
    pub kind: MatcherKind,
    /// Strength of a satisfied check.
    pub strength: Strength,
}

impl FieldMatcher {
    /// Create a matcher.
    #[must_use]
    pub fn new(kind: MatcherKind, strength: Strength) -> Self {
        Self { kind, strength }
    }

    /// Soft matcher for `kind`.
    #[must_use]
    pub fn soft(kind: MatcherKind) -> Self {
        Self::new(kind, Strength::Soft)
    }

    /// Hard matcher for `kind`.
    #[must_use]
    pub fn hard(kind: MatcherKind) -> Self {
        Self::new(kind, Strength::Hard)
    }

    /// Evaluate this matcher for `package` against `rule`.
    #[must_use]
    pub fn evaluate(&self, package: &Package, rule: &CategoryRule) -> MatchOutcome {
        let satisfied = match self.kind {
            MatcherKind::Matches => rule
                .matches
                .as_ref()
                .map(|pattern| pattern.is_match(&package.name)),
            MatcherKind::Private => rule.private.map(|private| private == package.is_private),
            MatcherKind::Reach => rule
                .reach
                .map(|reach| reach.accepts(package.relationship_count())),
        };

        match (satisfied, self.strength) {
            (None, _) | (Some(true), Strength::Soft) => MatchOutcome::Indifferent,
            (Some(true), Strength::Hard) => MatchOutcome::Match,
            (Some(false), _) => MatchOutcome::NoMatch,
        }
    }
}

/// Ordered matchers applied to every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherChain {
    matchers: Vec<FieldMatcher>,
}

impl MatcherChain {
    /// Chain evaluating `matchers` in order.
    #[must_use]
    pub fn new(matchers: Vec<FieldMatcher>) -> Self {
        Self { matchers }
    }

    /// The matchers in evaluation order.
    #[must_use]
    pub fn matchers(&self) -> &[FieldMatcher] {
        &self.matchers
    }

    /// First decisive outcome, or `Match` if every matcher is indifferent.
    #[must_use]
    pub fn evaluate(&self, package: &Package, rule: &CategoryRule) -> MatchOutcome {
        self.matchers
            .iter()
            .map(|matcher| matcher.evaluate(package, rule))
            .find(|outcome| *outcome != MatchOutcome::Indifferent)
            .unwrap_or(MatchOutcome::Match)
    }

    /// True when `rule` accepts `package`.
    #[must_use]
    pub fn matches(&self, package: &Package, rule: &CategoryRule) -> bool {
        self.evaluate(package, rule) == MatchOutcome::Match
    }
}

impl Default for MatcherChain {
    /// `matches`, `private`, `reach`, all soft.
    fn default() -> Self {
        Self::new(vec![
            FieldMatcher::soft(MatcherKind::Matches),
            FieldMatcher::soft(MatcherKind::Private),
            FieldMatcher::soft(MatcherKind::Reach),
        ])
    }
}

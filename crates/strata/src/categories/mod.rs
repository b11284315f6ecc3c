//! Categorization engine.
//!
//! Rules are evaluated in declaration order and the first one whose
//! [`MatcherChain`] accepts a package is its category.

mod config;
mod matcher;
mod rule;

pub use config::{CategoryConfig, OrderEntry};
pub use matcher::{FieldMatcher, MatchOutcome, MatcherChain, MatcherKind, Strength};
pub use rule::{CategoryRule, GroupRule, RawCategoryRule, ReachRule};

use crate::domain::Package;

/// First rule in `config` that accepts `package`.
#[must_use]
pub fn match_category<'c>(package: &Package, config: &'c CategoryConfig) -> Option<&'c CategoryRule> {
    config.match_category(package)
}

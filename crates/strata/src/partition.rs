//! Graph partitioner.
//!
//! Splits the workspace into the filter sets that become diagrams: one per
//! group key (the union of its members' reach) and one per ungrouped package
//! (that package's reach). Every member's `filename_base` is pointed at the
//! diagram it belongs to.

use crate::categories::CategoryConfig;
use crate::domain::Workspace;
use crate::reach::union_reach;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// A named set of package names scoping one diagram.
pub type FilterSet = BTreeSet<String>;

/// Filter sets derived from categories and reach.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    /// Package name → that package's reach.
    pub ungrouped: BTreeMap<String, FilterSet>,
    /// Group key → union of the reach of every member.
    pub grouped: BTreeMap<String, FilterSet>,
    /// Group key → the packages assigned to it.
    pub group_members: BTreeMap<String, BTreeSet<String>>,
}

impl Partition {
    /// Group key `package` was assigned to, if any.
    #[must_use]
    pub fn group_of(&self, package: &str) -> Option<&str> {
        self.group_members
            .iter()
            .find(|(_, members)| members.contains(package))
            .map(|(group, _)| group.as_str())
    }
}

/// Partition `workspace` by the group keys of each member's category and
/// assign every member's `filename_base`.
pub fn split_graphs(workspace: &mut Workspace, config: &CategoryConfig) -> Partition {
    let mut partition = Partition::default();
    let mut ungrouped: Vec<String> = Vec::new();

    for package in workspace.members() {
        match config
            .match_category(package)
            .and_then(|rule| rule.group_key())
        {
            Some(group) => {
                partition
                    .group_members
                    .entry(group.to_string())
                    .or_default()
                    .insert(package.name.clone());
            }
            None => ungrouped.push(package.name.clone()),
        }
    }

    for name in ungrouped {
        if let Some(package) = workspace.get(&name) {
            partition.ungrouped.insert(name, package.reach());
        }
    }

    for (group, members) in &partition.group_members {
        let reach = union_reach(members.iter().filter_map(|name| workspace.get(name)));
        partition.grouped.insert(group.clone(), reach);
    }

    for package in workspace.members_mut() {
        package.filename_base = match partition.group_of(&package.name) {
            Some(group) => group_filename(group),
            None => package_filename(&package.name),
        };
    }

    debug!(
        groups = partition.grouped.len(),
        ungrouped = partition.ungrouped.len(),
        "Partitioned workspace"
    );
    partition
}

/// Make `name` usable as a file name: `/` and space become `__`, `@` becomes
/// `[at]_`.
#[must_use]
pub fn safe_filename(name: &str) -> String {
    name.replace(['/', ' '], "__").replace('@', "[at]_")
}

/// Diagram base name for an ungrouped package.
#[must_use]
pub fn package_filename(name: &str) -> String {
    format!("package__{}", safe_filename(name))
}

/// Diagram base name for a group.
#[must_use]
pub fn group_filename(group: &str) -> String {
    format!("group__{}", safe_filename(group))
}

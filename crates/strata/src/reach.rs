//! One-hop reachability.
//!
//! The reach of a package is the package itself, its direct dependencies and
//! its direct dependents. It is deliberately not transitive: a package's
//! diagram shows its immediate neighbourhood only.

use crate::domain::Package;
use std::collections::BTreeSet;

/// `{package} ∪ requires ∪ needed_by`.
#[must_use]
pub fn reach(package: &Package) -> BTreeSet<String> {
    let mut set = BTreeSet::from([package.name.clone()]);
    set.extend(package.requires.iter().cloned());
    set.extend(package.needed_by.iter().cloned());
    set
}

/// Number of distinct packages directly related to `package`.
///
/// A package that both requires and is needed by the same neighbour counts
/// that neighbour once.
#[must_use]
pub fn relationship_count(package: &Package) -> usize {
    reach(package).len() - 1
}

/// Union of the reach of every package in `packages`.
pub fn union_reach<'a>(packages: impl IntoIterator<Item = &'a Package>) -> BTreeSet<String> {
    packages.into_iter().flat_map(reach).collect()
}

impl Package {
    /// See [`reach`].
    #[must_use]
    pub fn reach(&self) -> BTreeSet<String> {
        reach(self)
    }

    /// See [`relationship_count`].
    #[must_use]
    pub fn relationship_count(&self) -> usize {
        relationship_count(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Workspace;

    fn chain() -> Workspace {
        Workspace::new(
            Package::new("root", ""),
            vec![
                Package::new("a", "a").declaring(["b"]),
                Package::new("b", "b").declaring(["c"]),
                Package::new("c", "c"),
                Package::new("lonely", "lonely"),
            ],
        )
        .unwrap()
    }

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn reach_is_one_hop_in_both_directions() {
        let ws = chain();
        assert_eq!(ws.get("b").unwrap().reach(), names(&["a", "b", "c"]));
        assert_eq!(ws.get("a").unwrap().reach(), names(&["a", "b"]));
    }

    #[test]
    fn isolated_package_reaches_itself() {
        let ws = chain();
        let lonely = ws.get("lonely").unwrap();
        assert_eq!(lonely.reach(), names(&["lonely"]));
        assert_eq!(lonely.relationship_count(), 0);
    }

    #[test]
    fn mutual_neighbour_counts_once() {
        let ws = Workspace::new(
            Package::new("root", ""),
            vec![
                Package::new("a", "a").declaring(["b"]),
                Package::new("b", "b").declaring(["a"]),
            ],
        )
        .unwrap();
        assert_eq!(ws.get("a").unwrap().relationship_count(), 1);
    }

    #[test]
    fn union_reach_merges_sets() {
        let ws = chain();
        let merged = union_reach([ws.get("a").unwrap(), ws.get("lonely").unwrap()]);
        assert_eq!(merged, names(&["a", "b", "lonely"]));
    }
}

//! Topological layering.
//!
//! [`order_and_trim`] restricts the package universe to a filter set, trims
//! edges by interest, and orders the remaining nodes so dependents come
//! before their dependencies. Nodes are peeled off in layers of nodes with no
//! unresolved children; each layer is sorted by `(sort_key, id)`. Nodes left
//! over because they sit on or above a cycle form one final catch-all layer,
//! sorted the same way. The whole sequence is then reversed.

use crate::domain::{Node, Package};
use crate::error::{Error, Result};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, warn};

/// Ordered, trimmed view of one filter set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayeredGraph {
    /// Package names, dependents first.
    pub order: Vec<String>,
    /// Package name → positional id (`pkg_00`, `pkg_01`, ...).
    pub ids: BTreeMap<String, String>,
    /// Positional id → positional ids of its trimmed children.
    pub edges: BTreeMap<String, BTreeSet<String>>,
    /// Layers in extraction order (leaves first), catch-all layer last.
    pub layers: Vec<Vec<String>>,
    /// Strongly connected components that forced the catch-all layer, each
    /// sorted by name.
    pub cycles: Vec<Vec<String>>,
}

impl LayeredGraph {
    /// Positional id of `name`.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }

    /// `(positional id, package name)` pairs in order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .filter_map(|name| self.id_of(name).map(|id| (id, name.as_str())))
    }

    /// Trimmed children of `name`, as positional ids.
    #[must_use]
    pub fn children_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.id_of(name).and_then(|id| self.edges.get(id))
    }

    /// Number of ordered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the filter set was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Positional id for the node at `index` in the final order.
#[must_use]
pub fn positional_id(index: usize) -> String {
    format!("pkg_{index:02}")
}

/// Order and trim the packages named by `filter`.
///
/// `interesting` marks nodes that keep every child inside the filter set;
/// other nodes keep only children that are themselves interesting.
///
/// # Errors
///
/// Returns `Error::PackageNotFound` if `filter` names a package missing from
/// `packages`.
pub fn order_and_trim<F>(
    filter: &BTreeSet<String>,
    packages: &BTreeMap<String, Package>,
    interesting: F,
) -> Result<LayeredGraph>
where
    F: Fn(&str) -> bool,
{
    let nodes = filter
        .iter()
        .map(|name| {
            let package = packages
                .get(name)
                .ok_or_else(|| Error::PackageNotFound(name.clone()))?;
            Ok::<_, Error>(trim(package.node(), filter, &interesting))
        })
        .collect::<Result<Vec<Node>>>()?;

    let trimmed: HashMap<String, BTreeSet<String>> = nodes
        .iter()
        .map(|node| (node.id.clone(), node.children.clone()))
        .collect();

    let mut remaining: BTreeMap<String, Node> =
        nodes.into_iter().map(|node| (node.id.clone(), node)).collect();
    let mut layers: Vec<Vec<String>> = Vec::new();

    loop {
        let layer = extract_layer(&mut remaining);
        if layer.is_empty() {
            break;
        }
        layers.push(layer);
    }

    let mut cycles = Vec::new();
    if !remaining.is_empty() {
        cycles = find_cycles(&remaining);
        for cycle in &cycles {
            warn!(packages = ?cycle, "Dependency cycle; ordering by location");
        }
        layers.push(sorted_ids(remaining.values()));
    }

    let order: Vec<String> = layers.iter().flatten().rev().cloned().collect();
    let ids: BTreeMap<String, String> = order
        .iter()
        .enumerate()
        .map(|(index, name)| (name.clone(), positional_id(index)))
        .collect();
    let edges: BTreeMap<String, BTreeSet<String>> = order
        .iter()
        .map(|name| {
            let children = trimmed
                .get(name)
                .map(|children| {
                    children
                        .iter()
                        .filter_map(|child| ids.get(child).cloned())
                        .collect::<BTreeSet<String>>()
                })
                .unwrap_or_default();
            (ids[name].clone(), children)
        })
        .collect();

    debug!(
        nodes = order.len(),
        layers = layers.len(),
        cycles = cycles.len(),
        "Layered filter set"
    );

    Ok(LayeredGraph {
        order,
        ids,
        edges,
        layers,
        cycles,
    })
}

fn trim<F>(mut node: Node, filter: &BTreeSet<String>, interesting: &F) -> Node
where
    F: Fn(&str) -> bool,
{
    let keep_all = interesting(&node.id);
    node.children
        .retain(|child| filter.contains(child) && (keep_all || interesting(child)));
    node
}

fn extract_layer(remaining: &mut BTreeMap<String, Node>) -> Vec<String> {
    let layer = sorted_ids(remaining.values().filter(|node| node.children.is_empty()));
    for id in &layer {
        remaining.remove(id);
    }
    for node in remaining.values_mut() {
        for id in &layer {
            node.children.remove(id);
        }
    }
    layer
}

fn sorted_ids<'a>(nodes: impl Iterator<Item = &'a Node>) -> Vec<String> {
    let mut nodes: Vec<&Node> = nodes.collect();
    nodes.sort_by(|a, b| (&a.sort_key, &a.id).cmp(&(&b.sort_key, &b.id)));
    nodes.into_iter().map(|node| node.id.clone()).collect()
}

fn find_cycles(remaining: &BTreeMap<String, Node>) -> Vec<Vec<String>> {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let indices: HashMap<&str, NodeIndex> = remaining
        .keys()
        .map(|id| (id.as_str(), graph.add_node(id.as_str())))
        .collect();

    for node in remaining.values() {
        for child in &node.children {
            if let (Some(&from), Some(&to)) = (indices.get(node.id.as_str()), indices.get(child.as_str())) {
                graph.add_edge(from, to, ());
            }
        }
    }

    let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|index| graph.find_edge(*index, *index).is_some())
        })
        .map(|component| {
            let mut ids: Vec<String> = component
                .into_iter()
                .map(|index| graph[index].to_string())
                .collect();
            ids.sort_unstable();
            ids
        })
        .collect();
    cycles.sort_unstable();
    cycles
}

//! Directed graph storage for the sort engines.
//!
//! Nodes are kept in insertion order alongside a name-to-index map. Every
//! node also caches the indices of its successors so the engines can walk
//! the graph without repeated name lookups.

use crate::NodeId;
use indexmap::IndexMap;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A node and its ordered successor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    id: NodeId,
    successors: Vec<NodeId>,
    targets: Vec<usize>,
}

impl GraphNode {
    /// The node identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Successor identifiers in adjacency order. Parallel edges repeat.
    #[must_use]
    pub fn successors(&self) -> &[NodeId] {
        &self.successors
    }

    pub(crate) fn targets(&self) -> &[usize] {
        &self.targets
    }
}

/// An immutable directed graph keyed by node identifier.
///
/// Key order is the order nodes were first declared; successor order is the
/// order edges were written. Both orders drive the sort engines, so two
/// graphs built from the same text always produce the same traces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    name_to_node: HashMap<NodeId, usize>,
}

impl Graph {
    /// Build a graph from an ordered adjacency mapping.
    ///
    /// Targets that are not keys are appended as nodes with no successors,
    /// in the order they are first referenced.
    pub(crate) fn from_adjacency(mut adjacency: IndexMap<NodeId, Vec<NodeId>>) -> Self {
        let undeclared: Vec<NodeId> = adjacency
            .values()
            .flatten()
            .filter(|target| !adjacency.contains_key(target.as_str()))
            .cloned()
            .collect();
        for target in undeclared {
            adjacency.entry(target).or_default();
        }

        let name_to_node: HashMap<NodeId, usize> = adjacency
            .keys()
            .enumerate()
            .map(|(index, id)| (id.clone(), index))
            .collect();

        let nodes = adjacency
            .into_iter()
            .map(|(id, successors)| {
                debug_assert!(!successors.contains(&id), "self-loop on '{id}'");
                let targets = successors
                    .iter()
                    .filter_map(|target| name_to_node.get(target).copied())
                    .collect();
                GraphNode {
                    id,
                    successors,
                    targets,
                }
            })
            .collect();

        Self {
            nodes,
            name_to_node,
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges, counting parallel edges separately.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.successors.len()).sum()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over nodes in key order.
    pub fn iter(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    /// Iterate over node identifiers in key order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.id.as_str())
    }

    /// Successors of `id`, or `None` if the node does not exist.
    #[must_use]
    pub fn successors(&self, id: &str) -> Option<&[NodeId]> {
        self.name_to_node
            .get(id)
            .map(|&index| self.nodes[index].successors.as_slice())
    }

    /// Iterate over every edge as `(from, to)` in key then adjacency order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.iter().flat_map(|node| {
            node.successors
                .iter()
                .map(move |target| (node.id.as_str(), target.as_str()))
        })
    }

    /// Check if the graph contains a directed cycle.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.to_petgraph())
    }

    pub(crate) fn node(&self, index: usize) -> &GraphNode {
        &self.nodes[index]
    }

    pub(crate) fn name(&self, index: usize) -> &NodeId {
        &self.nodes[index].id
    }

    pub(crate) fn names(&self, indices: impl IntoIterator<Item = usize>) -> Vec<NodeId> {
        indices
            .into_iter()
            .map(|index| self.name(index).clone())
            .collect()
    }

    fn to_petgraph(&self) -> DiGraph<&str, ()> {
        let mut graph = DiGraph::with_capacity(self.node_count(), self.edge_count());
        let indices: Vec<_> = self
            .nodes
            .iter()
            .map(|node| graph.add_node(node.id.as_str()))
            .collect();
        for (from, node) in self.nodes.iter().enumerate() {
            for &to in &node.targets {
                graph.add_edge(indices[from], indices[to], ());
            }
        }
        graph
    }
}

/// Writes the graph back out in adjacency-list form, one node per line.
impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, node) in self.nodes.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}:", node.id)?;
            if !node.successors.is_empty() {
                write!(f, " {}", node.successors.join(","))?;
            }
        }
        Ok(())
    }
}

impl Serialize for Graph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for node in &self.nodes {
            map.serialize_entry(&node.id, &node.successors)?;
        }
        map.end()
    }
}

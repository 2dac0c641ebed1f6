//! Random acyclic graph generation.

use crate::{Graph, NodeId};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::debug;

/// Attempts allowed per requested edge before giving up.
const ATTEMPTS_PER_EDGE: usize = 5;

/// Generate a random DAG with nodes named `0..node_count`.
///
/// Edges only run from a lower-numbered node to a higher-numbered one, so
/// the result is always acyclic. Duplicate draws are discarded. Generation
/// stops at `edge_count` edges clamped to the `n(n-1)/2` ceiling, or after
/// five draws per clamped edge, whichever comes first; the result may
/// therefore hold fewer edges than requested.
pub fn random_dag<R: Rng>(node_count: usize, edge_count: usize, rng: &mut R) -> Graph {
    let mut adjacency: IndexMap<NodeId, Vec<NodeId>> = (0..node_count)
        .map(|node| (node.to_string(), Vec::new()))
        .collect();
    if node_count == 0 {
        return Graph::from_adjacency(adjacency);
    }

    let max_edges = node_count.saturating_mul(node_count - 1) / 2;
    let target = edge_count.min(max_edges);
    let max_attempts = target.saturating_mul(ATTEMPTS_PER_EDGE);
    let mut edges = HashSet::new();
    let mut attempts = 0;
    while edges.len() < target && attempts < max_attempts {
        attempts += 1;
        let from = rng.random_range(0..node_count);
        let to = rng.random_range(0..node_count);
        if from >= to {
            continue;
        }
        if edges.insert((from, to)) {
            adjacency[from].push(to.to_string());
        }
    }

    debug!(
        nodes = node_count,
        edges = edges.len(),
        requested = edge_count,
        attempts,
        "Generated random DAG"
    );
    Graph::from_adjacency(adjacency)
}

/// Like [`random_dag`], but reproducible from `seed`.
#[must_use]
pub fn seeded_dag(node_count: usize, edge_count: usize, seed: u64) -> Graph {
    random_dag(node_count, edge_count, &mut StdRng::seed_from_u64(seed))
}

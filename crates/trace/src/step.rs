//! Step records: immutable snapshots of one state transition.

use crate::NodeId;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Per-node progress during a sort run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    /// Not reached yet.
    Unvisited,
    /// Waiting in Kahn's queue.
    Queued,
    /// Currently being expanded.
    Visiting,
    /// Placed in the output.
    Processed,
}

impl NodeState {
    /// Position along the state lifecycle. A node's rank never decreases
    /// during a run.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Unvisited => 0,
            Self::Queued => 1,
            Self::Visiting => 2,
            Self::Processed => 3,
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unvisited => "unvisited",
            Self::Queued => "queued",
            Self::Visiting => "visiting",
            Self::Processed => "processed",
        };
        write!(f, "{s}")
    }
}

/// Node states keyed by identifier, in graph key order.
pub type StateMap = IndexMap<NodeId, NodeState>;

/// Algorithm-specific working data captured alongside each step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Auxiliary {
    /// Depth-first sort: the post-order output stack, bottom first.
    Dfs {
        /// Finished nodes in the order they were pushed.
        stack: Vec<NodeId>,
    },
    /// Kahn's algorithm: queue, remaining in-degrees and emitted prefix.
    Bfs {
        /// Queue contents, front first.
        queue: Vec<NodeId>,
        /// Remaining in-degree of every node.
        #[serde(rename = "inDegree")]
        in_degree: IndexMap<NodeId, usize>,
        /// Nodes emitted so far.
        result: Vec<NodeId>,
    },
}

/// One frame of a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Human-readable description of the transition.
    pub message: String,
    /// State of every node after the transition.
    pub states: StateMap,
    /// Stack or queue contents.
    pub auxiliary: Auxiliary,
    /// Node the step concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_node: Option<NodeId>,
    /// Edge the step concerns, as `(from, to)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_edge: Option<(NodeId, NodeId)>,
    /// Ordered output carried by the terminal step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<NodeId>>,
    /// Set on the last step of a run.
    #[serde(rename = "final")]
    pub is_final: bool,
    /// Set when the run ended without a complete order.
    pub error: bool,
    /// Closed cycle walk reported by the depth-first engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle: Option<Vec<NodeId>>,
}

impl Step {
    pub(crate) fn new(message: impl Into<String>, states: StateMap, auxiliary: Auxiliary) -> Self {
        Self {
            message: message.into(),
            states,
            auxiliary,
            active_node: None,
            active_edge: None,
            result: None,
            is_final: false,
            error: false,
            cycle: None,
        }
    }

    #[must_use]
    pub(crate) fn with_active_node(mut self, node: &str) -> Self {
        self.active_node = Some(node.to_string());
        self
    }

    #[must_use]
    pub(crate) fn with_active_edge(mut self, from: &str, to: &str) -> Self {
        self.active_edge = Some((from.to_string(), to.to_string()));
        self
    }

    /// Mark as the terminal step of a successful run.
    #[must_use]
    pub(crate) fn completed(mut self, result: Vec<NodeId>) -> Self {
        self.result = Some(result);
        self.is_final = true;
        self
    }

    /// Mark as the terminal step of a failed run.
    #[must_use]
    pub(crate) fn failed(mut self) -> Self {
        self.is_final = true;
        self.error = true;
        self
    }

    /// State of `node` in this snapshot.
    #[must_use]
    pub fn state_of(&self, node: &str) -> Option<NodeState> {
        self.states.get(node).copied()
    }

    /// Edges along the reported cycle, as consecutive `(from, to)` pairs.
    pub fn cycle_edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cycle
            .iter()
            .flat_map(|path| path.windows(2))
            .filter_map(|pair| match pair {
                [from, to] => Some((from.as_str(), to.as_str())),
                _ => None,
            })
    }
}

//! Error types for graph ingestion and sort runs.

use crate::NodeId;
use thiserror::Error;

/// Result type for trace engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that prevent a trace from being produced at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed adjacency-list or adjacency-matrix input.
    #[error(
        "Invalid graph format{}: {message}",
        .line.map(|line| format!(" on line {line}")).unwrap_or_default()
    )]
    Format {
        /// 1-based line number of the offending input line, if any.
        line: Option<usize>,
        /// Human-readable description of the problem.
        message: String,
    },

    /// A graph with no nodes was handed to a sort engine.
    #[error("Graph is empty. Please enter a valid graph.")]
    EmptyGraph,
}

impl Error {
    /// Create a format error tied to an input line.
    #[must_use]
    pub fn format_at(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line: Some(line),
            message: message.into(),
        }
    }

    /// Create a format error that concerns the input as a whole.
    #[must_use]
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            line: None,
            message: message.into(),
        }
    }
}

/// Why a completed run failed to produce a topological order.
///
/// These never abort a run: the trace still ends with a flagged step and
/// can be replayed in full. This type exists so callers can surface the
/// failure through ordinary error handling once playback is over.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortFailure {
    /// The DFS engine followed a back edge to a node still on its path.
    #[error("Cycle detected: {}", .path.join(" → "))]
    Cycle {
        /// Closed walk starting and ending at the repeated node.
        path: Vec<NodeId>,
    },

    /// Kahn's algorithm drained its queue before emitting every node.
    #[error("Cycle detected: only {} of {total} nodes could be ordered", .partial.len())]
    IncompleteOrder {
        /// Nodes emitted before the queue ran dry.
        partial: Vec<NodeId>,
        /// Number of nodes in the graph.
        total: usize,
    },
}

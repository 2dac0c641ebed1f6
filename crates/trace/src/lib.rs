//! Step-by-step topological sort traces for toposcope.
//!
//! This crate parses directed graphs from text and runs two topological
//! sorts over them, recording every state transition as a [`Step`]. The
//! resulting [`Trace`] can be replayed one step at a time by a front-end.
//!
//! # Key Types
//!
//! - [`Graph`]: an immutable, insertion-ordered adjacency list
//! - [`Trace`]: the steps of one run plus its [`Outcome`]
//! - [`Step`]: a snapshot of node states and the algorithm's working data
//!
//! # Example
//!
//! ```
//! use toposcope_trace::{Algorithm, InputMode, parse, run};
//!
//! let graph = parse("0: 1,2\n1: 3\n2: 3\n3:", InputMode::List)?;
//! let trace = run(&graph, Algorithm::Dfs)?;
//!
//! assert_eq!(trace.order().unwrap(), ["0", "2", "1", "3"]);
//! assert!(trace.last().unwrap().is_final);
//! # Ok::<(), toposcope_trace::Error>(())
//! ```
//!
//! A cycle does not make [`run`] fail. The trace ends with an error step
//! instead, so the run can still be replayed up to the point of failure:
//!
//! ```
//! use toposcope_trace::{Algorithm, InputMode, Outcome, parse, run};
//!
//! let graph = parse("0: 1\n1: 0", InputMode::List)?;
//! let trace = run(&graph, Algorithm::Dfs)?;
//!
//! assert_eq!(trace.outcome(), &Outcome::Cycle { path: vec!["0".into(), "1".into(), "0".into()] });
//! # Ok::<(), toposcope_trace::Error>(())
//! ```

mod bfs;
mod dfs;
mod error;
pub mod generate;
mod graph;
mod parse;
mod step;
mod trace;
mod validation;

pub use bfs::run_bfs;
pub use dfs::run_dfs;
pub use error::{Error, Result, SortFailure};
pub use graph::{Graph, GraphNode};
pub use parse::{InputMode, parse, parse_adjacency_list, parse_adjacency_matrix};
pub use step::{Auxiliary, NodeState, StateMap, Step};
pub use trace::{Outcome, Trace};
pub use validation::{ValidationIssue, ValidationResult};

use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Identifier of a graph node. Compared by exact string match.
pub type NodeId = String;

/// Which sort to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Depth-first search with a post-order stack.
    #[default]
    Dfs,
    /// Kahn's in-degree elimination.
    Bfs,
}

impl Algorithm {
    /// Upper-case label used in summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dfs => "DFS",
            Self::Bfs => "BFS",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Dfs => "dfs",
            Self::Bfs => "bfs",
        };
        write!(f, "{s}")
    }
}

/// Run `algorithm` over `graph`.
///
/// # Errors
///
/// Returns [`Error::EmptyGraph`] if the graph has no nodes. Cycles are not
/// errors here; see [`Trace::outcome`].
pub fn run(graph: &Graph, algorithm: Algorithm) -> Result<Trace> {
    if graph.is_empty() {
        return Err(Error::EmptyGraph);
    }

    let trace = match algorithm {
        Algorithm::Dfs => run_dfs(graph),
        Algorithm::Bfs => run_bfs(graph),
    };
    debug!(
        algorithm = %algorithm,
        steps = trace.len(),
        sorted = trace.outcome().is_sorted(),
        "Recorded trace"
    );
    Ok(trace)
}

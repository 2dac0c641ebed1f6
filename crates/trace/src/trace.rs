//! Trace recording and the finished, replayable trace.

use crate::step::{Auxiliary, NodeState, StateMap, Step};
use crate::{Algorithm, Graph, NodeId, SortFailure};
use serde::Serialize;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// Every node was ordered.
    Sorted {
        /// The topological order.
        order: Vec<NodeId>,
    },
    /// The depth-first engine found a back edge.
    Cycle {
        /// Closed walk starting and ending at the repeated node.
        path: Vec<NodeId>,
    },
    /// Kahn's algorithm could not order every node.
    Incomplete {
        /// Nodes emitted before the queue ran dry.
        partial: Vec<NodeId>,
        /// Number of nodes in the graph.
        total: usize,
    },
}

impl Outcome {
    /// Returns true if a full order was produced.
    #[must_use]
    pub const fn is_sorted(&self) -> bool {
        matches!(self, Self::Sorted { .. })
    }

    /// Convert into the order, or the reason there is none.
    ///
    /// # Errors
    ///
    /// Returns the [`SortFailure`] matching a cycle or incomplete outcome.
    pub fn into_result(self) -> Result<Vec<NodeId>, SortFailure> {
        match self {
            Self::Sorted { order } => Ok(order),
            Self::Cycle { path } => Err(SortFailure::Cycle { path }),
            Self::Incomplete { partial, total } => {
                Err(SortFailure::IncompleteOrder { partial, total })
            }
        }
    }
}

/// The ordered steps of one algorithm run.
///
/// A trace is never empty and its last step is always flagged final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace {
    algorithm: Algorithm,
    steps: Vec<Step>,
    outcome: Outcome,
}

impl Trace {
    /// Which engine produced this trace.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// All steps in order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Step at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for traces produced by the engines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The terminal step.
    #[must_use]
    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// How the run ended.
    #[must_use]
    pub const fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// The topological order, if the run succeeded.
    #[must_use]
    pub fn order(&self) -> Option<&[NodeId]> {
        match &self.outcome {
            Outcome::Sorted { order } => Some(order),
            _ => None,
        }
    }

    /// The failure, if the run did not produce an order.
    #[must_use]
    pub fn failure(&self) -> Option<SortFailure> {
        self.outcome.clone().into_result().err()
    }
}

/// Append-only step log owned by a running engine.
///
/// Holds the live node states so every recorded step carries a full copy.
pub(crate) struct TraceRecorder<'g> {
    graph: &'g Graph,
    algorithm: Algorithm,
    states: Vec<NodeState>,
    steps: Vec<Step>,
}

impl<'g> TraceRecorder<'g> {
    pub(crate) fn new(graph: &'g Graph, algorithm: Algorithm) -> Self {
        Self {
            graph,
            algorithm,
            states: vec![NodeState::Unvisited; graph.node_count()],
            steps: Vec::new(),
        }
    }

    pub(crate) fn state(&self, index: usize) -> NodeState {
        self.states[index]
    }

    pub(crate) fn set_state(&mut self, index: usize, state: NodeState) {
        debug_assert!(
            state.rank() >= self.states[index].rank(),
            "state of '{}' regressed from {} to {state}",
            self.graph.name(index),
            self.states[index],
        );
        self.states[index] = state;
    }

    /// A step carrying the current state snapshot.
    pub(crate) fn step(&self, message: impl Into<String>, auxiliary: Auxiliary) -> Step {
        Step::new(message, self.snapshot(), auxiliary)
    }

    pub(crate) fn record(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub(crate) fn finish(self, outcome: Outcome) -> Trace {
        debug_assert!(self.steps.last().is_some_and(|step| step.is_final));
        Trace {
            algorithm: self.algorithm,
            steps: self.steps,
            outcome,
        }
    }

    fn snapshot(&self) -> StateMap {
        self.states
            .iter()
            .enumerate()
            .map(|(index, &state)| (self.graph.name(index).clone(), state))
            .collect()
    }
}

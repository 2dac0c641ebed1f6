//! Depth-first topological sort with back-edge cycle detection.

use crate::step::{Auxiliary, NodeState};
use crate::trace::{Outcome, Trace, TraceRecorder};
use crate::{Algorithm, Graph};
use tracing::debug;

/// A node on the current descent path and the next successor to explore.
struct Frame {
    node: usize,
    next: usize,
}

/// Run the depth-first sort over `graph` and record every transition.
///
/// Roots are taken in key order and successors in adjacency order, so the
/// trace is fully determined by the graph. The run stops at the first back
/// edge; the terminal step then carries the cycle instead of a result.
#[must_use]
pub fn run_dfs(graph: &Graph) -> Trace {
    DfsRun::new(graph).run()
}

struct DfsRun<'g> {
    graph: &'g Graph,
    recorder: TraceRecorder<'g>,
    /// Descent path; doubles as the recursion stack.
    path: Vec<Frame>,
    on_path: Vec<bool>,
    /// Post-order output stack.
    output: Vec<usize>,
}

impl<'g> DfsRun<'g> {
    fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            recorder: TraceRecorder::new(graph, Algorithm::Dfs),
            path: Vec::new(),
            on_path: vec![false; graph.node_count()],
            output: Vec::new(),
        }
    }

    fn run(mut self) -> Trace {
        let start = self
            .recorder
            .step("Starting DFS-based Topological Sort", self.aux());
        self.recorder.record(start);

        for root in 0..self.graph.node_count() {
            if self.recorder.state(root) != NodeState::Unvisited {
                continue;
            }
            self.enter(root);

            while let Some(frame) = self.path.last_mut() {
                let node = frame.node;
                let Some(&target) = self.graph.node(node).targets().get(frame.next) else {
                    self.leave();
                    continue;
                };
                frame.next += 1;

                let from = self.graph.name(node);
                let to = self.graph.name(target);
                let explore = self
                    .recorder
                    .step(format!("Exploring edge {from} → {to}"), self.aux())
                    .with_active_edge(from, to);
                self.recorder.record(explore);

                if self.on_path[target] {
                    return self.abort(node, target);
                }
                if self.recorder.state(target) == NodeState::Unvisited {
                    self.enter(target);
                }
            }
        }

        let order = self.graph.names(self.output.iter().rev().copied());
        debug!(nodes = order.len(), "DFS produced a topological order");
        let done = self
            .recorder
            .step(
                "Reversing stack to get topological order",
                Auxiliary::Dfs { stack: Vec::new() },
            )
            .completed(order.clone());
        self.recorder.record(done);
        self.recorder.finish(Outcome::Sorted { order })
    }

    fn enter(&mut self, node: usize) {
        self.on_path[node] = true;
        self.path.push(Frame { node, next: 0 });
        self.recorder.set_state(node, NodeState::Visiting);

        let name = self.graph.name(node);
        let step = self
            .recorder
            .step(format!("Visiting node {name}"), self.aux())
            .with_active_node(name);
        self.recorder.record(step);
    }

    fn leave(&mut self) {
        let Some(Frame { node, .. }) = self.path.pop() else {
            return;
        };
        self.on_path[node] = false;
        self.recorder.set_state(node, NodeState::Processed);
        self.output.push(node);

        let name = self.graph.name(node);
        let step = self.recorder.step(
            format!("Finished processing node {name}, adding to stack"),
            self.aux(),
        );
        self.recorder.record(step);
    }

    /// Close the run on the back edge `node → target`.
    fn abort(mut self, node: usize, target: usize) -> Trace {
        let start = self
            .path
            .iter()
            .position(|frame| frame.node == target)
            .unwrap_or_default();
        let cycle = self.graph.names(
            self.path[start..]
                .iter()
                .map(|frame| frame.node)
                .chain(std::iter::once(target)),
        );
        debug!(cycle = ?cycle, "DFS found a back edge");

        let mut step = self
            .recorder
            .step(format!("Cycle detected: {}", cycle.join(" → ")), self.aux())
            .with_active_edge(self.graph.name(node), self.graph.name(target))
            .failed();
        step.cycle = Some(cycle.clone());
        self.recorder.record(step);
        self.recorder.finish(Outcome::Cycle { path: cycle })
    }

    fn aux(&self) -> Auxiliary {
        Auxiliary::Dfs {
            stack: self.graph.names(self.output.iter().copied()),
        }
    }
}

//! Kahn's algorithm: breadth-first topological sort by in-degree elimination.

use crate::step::{Auxiliary, NodeState};
use crate::trace::{Outcome, Trace, TraceRecorder};
use crate::{Algorithm, Graph};
use std::collections::VecDeque;
use tracing::debug;

/// Run Kahn's algorithm over `graph` and record every transition.
///
/// The queue is strictly FIFO and is seeded in key order; successors are
/// relaxed in adjacency order. A cycle shows up as nodes whose in-degree
/// never reaches zero, so the error step carries the partial order but no
/// cycle path.
#[must_use]
pub fn run_bfs(graph: &Graph) -> Trace {
    let node_count = graph.node_count();
    let mut recorder = TraceRecorder::new(graph, Algorithm::Bfs);

    let mut in_degree = vec![0_usize; node_count];
    for node in graph.iter() {
        for &target in node.targets() {
            in_degree[target] += 1;
        }
    }

    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut result: Vec<usize> = Vec::with_capacity(node_count);
    let aux = |queue: &VecDeque<usize>, in_degree: &[usize], result: &[usize]| Auxiliary::Bfs {
        queue: graph.names(queue.iter().copied()),
        in_degree: in_degree
            .iter()
            .enumerate()
            .map(|(index, &degree)| (graph.name(index).clone(), degree))
            .collect(),
        result: graph.names(result.iter().copied()),
    };

    let start = recorder.step(
        "Starting BFS (Kahn's) - Calculated in-degrees",
        aux(&queue, &in_degree, &result),
    );
    recorder.record(start);

    for (node, _) in in_degree.iter().enumerate().filter(|(_, d)| **d == 0) {
        queue.push_back(node);
        recorder.set_state(node, NodeState::Queued);
    }
    let seeded = recorder.step(
        format!(
            "Added nodes with 0 in-degree: [{}]",
            graph.names(queue.iter().copied()).join(", ")
        ),
        aux(&queue, &in_degree, &result),
    );
    recorder.record(seeded);

    while let Some(node) = queue.pop_front() {
        let name = graph.name(node);
        recorder.set_state(node, NodeState::Visiting);
        let visit = recorder
            .step(
                format!("Processing {name} from queue"),
                aux(&queue, &in_degree, &result),
            )
            .with_active_node(name);
        recorder.record(visit);

        result.push(node);
        recorder.set_state(node, NodeState::Processed);

        for &target in graph.node(node).targets() {
            let target_name = graph.name(target);
            in_degree[target] -= 1;
            let relax = recorder
                .step(
                    format!(
                        "Decremented in-degree of {target_name} to {}",
                        in_degree[target]
                    ),
                    aux(&queue, &in_degree, &result),
                )
                .with_active_edge(name, target_name);
            recorder.record(relax);

            if in_degree[target] == 0 {
                queue.push_back(target);
                recorder.set_state(target, NodeState::Queued);
                let enqueue = recorder.step(
                    format!("Added {target_name} to queue"),
                    aux(&queue, &in_degree, &result),
                );
                recorder.record(enqueue);
            }
        }
    }

    let order = graph.names(result.iter().copied());
    if order.len() < node_count {
        debug!(
            ordered = order.len(),
            total = node_count,
            "Kahn's algorithm left nodes unordered"
        );
        let mut step = recorder
            .step(
                "Error: Cycle detected! Not all nodes were visited.",
                aux(&queue, &in_degree, &result),
            )
            .failed();
        step.result = Some(order.clone());
        recorder.record(step);
        return recorder.finish(Outcome::Incomplete {
            partial: order,
            total: node_count,
        });
    }

    debug!(
        nodes = order.len(),
        "Kahn's algorithm produced a topological order"
    );
    let done = recorder
        .step(
            "Completed! All nodes processed.",
            aux(&queue, &in_degree, &result),
        )
        .completed(order.clone());
    recorder.record(done);
    recorder.finish(Outcome::Sorted { order })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_adjacency_list;
    use crate::step::Step;

    fn queue_of(step: &Step) -> Vec<String> {
        match &step.auxiliary {
            Auxiliary::Bfs { queue, .. } => queue.clone(),
            Auxiliary::Dfs { .. } => panic!("expected BFS auxiliary data"),
        }
    }

    #[test]
    fn test_reference_graph_order() {
        let graph = parse_adjacency_list("0: 1,2\n1: 3\n2: 3\n3: 4\n4:").unwrap();
        let trace = run_bfs(&graph);
        assert_eq!(trace.algorithm(), Algorithm::Bfs);
        assert_eq!(
            trace.order().unwrap(),
            ["0", "1", "2", "3", "4"].map(String::from)
        );
    }

    #[test]
    fn test_initial_steps_carry_in_degrees_and_seed() {
        let graph = parse_adjacency_list("a: c\nb: c\nc:").unwrap();
        let trace = run_bfs(&graph);
        let steps = trace.steps();

        let Auxiliary::Bfs { in_degree, .. } = &steps[0].auxiliary else {
            panic!("expected BFS auxiliary data");
        };
        assert_eq!(in_degree["a"], 0);
        assert_eq!(in_degree["c"], 2);

        assert_eq!(steps[1].message, "Added nodes with 0 in-degree: [a, b]");
        assert_eq!(queue_of(&steps[1]), ["a", "b"]);
        assert_eq!(steps[1].state_of("a"), Some(NodeState::Queued));
        assert_eq!(steps[1].state_of("c"), Some(NodeState::Unvisited));
    }

    #[test]
    fn test_step_sequence_for_fan_in() {
        let graph = parse_adjacency_list("a: c\nb: c\nc:").unwrap();
        let trace = run_bfs(&graph);
        let messages: Vec<&str> = trace.steps().iter().map(|s| s.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "Starting BFS (Kahn's) - Calculated in-degrees",
                "Added nodes with 0 in-degree: [a, b]",
                "Processing a from queue",
                "Decremented in-degree of c to 1",
                "Processing b from queue",
                "Decremented in-degree of c to 0",
                "Added c to queue",
                "Processing c from queue",
                "Completed! All nodes processed.",
            ]
        );
        assert_eq!(
            trace.steps()[5].active_edge,
            Some(("b".to_string(), "c".to_string()))
        );
    }

    #[test]
    fn test_parallel_edges_count_twice() {
        let graph = parse_adjacency_list("a: b,b\nb:").unwrap();
        let trace = run_bfs(&graph);
        let relaxed: Vec<&str> = trace
            .steps()
            .iter()
            .map(|s| s.message.as_str())
            .filter(|m| m.starts_with("Decremented"))
            .collect();
        assert_eq!(
            relaxed,
            [
                "Decremented in-degree of b to 1",
                "Decremented in-degree of b to 0"
            ]
        );
        assert_eq!(trace.order().unwrap(), ["a", "b"].map(String::from));
    }

    #[test]
    fn test_two_node_cycle_yields_empty_partial() {
        let graph = parse_adjacency_list("0: 1\n1: 0").unwrap();
        let trace = run_bfs(&graph);

        assert_eq!(
            trace.outcome(),
            &Outcome::Incomplete {
                partial: vec![],
                total: 2
            }
        );
        let last = trace.last().unwrap();
        assert!(last.is_final && last.error);
        assert!(last.cycle.is_none());
        assert_eq!(last.result.as_deref(), Some(&[][..]));
    }

    #[test]
    fn test_cycle_behind_acyclic_prefix() {
        let graph = parse_adjacency_list("s: a\na: b\nb: a").unwrap();
        let trace = run_bfs(&graph);
        assert_eq!(
            trace.outcome(),
            &Outcome::Incomplete {
                partial: vec!["s".into()],
                total: 3
            }
        );
        let last = trace.last().unwrap();
        assert_eq!(last.state_of("a"), Some(NodeState::Unvisited));
        assert_eq!(last.state_of("s"), Some(NodeState::Processed));
    }
}

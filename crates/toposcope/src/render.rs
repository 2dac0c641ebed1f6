//! Plain-text rendering of trace steps.

use crate::playback::Frame;
use toposcope_trace::{Algorithm, Auxiliary, Step, Trace};

const ARROW: &str = " → ";

fn join_path(nodes: &[String]) -> String {
    nodes.join(ARROW)
}

fn bracketed(nodes: &[String]) -> String {
    format!("[{}]", nodes.join(", "))
}

/// `Step N: message`, numbered from one.
#[must_use]
pub fn log_line(index: usize, step: &Step) -> String {
    format!("Step {}: {}", index + 1, step.message)
}

/// Every node with its state, the active node marked with `*`.
#[must_use]
pub fn states_line(step: &Step) -> String {
    let nodes: Vec<String> = step
        .states
        .iter()
        .map(|(node, state)| {
            let marker = if step.active_node.as_deref() == Some(node.as_str()) {
                "*"
            } else {
                ""
            };
            format!("{node}{marker}={state}")
        })
        .collect();
    format!("  nodes: {}", nodes.join(" "))
}

/// The engine's working data: the DFS stack, or the Kahn queue, emitted
/// prefix and remaining in-degrees.
#[must_use]
pub fn auxiliary_line(auxiliary: &Auxiliary) -> String {
    match auxiliary {
        Auxiliary::Dfs { stack } => format!("  stack: {}", bracketed(stack)),
        Auxiliary::Bfs {
            queue,
            in_degree,
            result,
        } => {
            let degrees: Vec<String> = in_degree
                .iter()
                .map(|(node, degree)| format!("{node}={degree}"))
                .collect();
            format!(
                "  queue: {}  result: {}  in-degree: {}",
                bracketed(queue),
                bracketed(result),
                degrees.join(" ")
            )
        }
    }
}

/// The highlighted edge, if any. Cycle edges come from the step's own
/// cycle path and nothing else.
#[must_use]
pub fn highlight_line(step: &Step) -> Option<String> {
    if step.cycle.is_some() {
        let edges: Vec<String> = step
            .cycle_edges()
            .map(|(from, to)| format!("{from}{ARROW}{to}"))
            .collect();
        return Some(format!("  cycle edges: {}", edges.join(", ")));
    }
    step.active_edge
        .as_ref()
        .map(|(from, to)| format!("  edge: {from}{ARROW}{to}"))
}

/// Closing summary shown once the final step is reached.
#[must_use]
pub fn summary(step: &Step, algorithm: Algorithm) -> Option<String> {
    if !step.is_final {
        return None;
    }
    if step.error {
        let detail = step.cycle.as_ref().map_or_else(
            || "A topological sort is not possible.".to_string(),
            |cycle| format!("The detected cycle path is: {}", join_path(cycle)),
        );
        return Some(format!("Error: Cycle Detected\n{detail}"));
    }
    let order = step.result.as_deref().unwrap_or_default();
    Some(format!(
        "Final Topological Order ({}): {}",
        algorithm.label(),
        join_path(order)
    ))
}

/// All lines for one step.
#[must_use]
pub fn render_step(index: usize, step: &Step, algorithm: Algorithm) -> String {
    let mut lines = vec![
        log_line(index, step),
        states_line(step),
        auxiliary_line(&step.auxiliary),
    ];
    lines.extend(highlight_line(step));
    if let Some(summary) = summary(step, algorithm) {
        lines.push(String::new());
        lines.push(summary);
    }
    lines.join("\n")
}

/// All lines for a frame received from a player.
#[must_use]
pub fn render_frame(frame: &Frame, algorithm: Algorithm) -> String {
    render_step(frame.index, &frame.step, algorithm)
}

/// A whole trace, steps separated by blank lines.
#[must_use]
pub fn render_trace(trace: &Trace) -> String {
    trace
        .steps()
        .iter()
        .enumerate()
        .map(|(index, step)| render_step(index, step, trace.algorithm()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

//! A cursor over a recorded trace.

use toposcope_trace::{Step, Trace};

/// Playback position within one [`Trace`].
///
/// The cursor always points at a step that has been shown. A fresh session
/// starts on the first step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    trace: Trace,
    cursor: usize,
}

impl Session {
    /// Start a session on the first step of `trace`.
    #[must_use]
    pub const fn new(trace: Trace) -> Self {
        Self { trace, cursor: 0 }
    }

    /// The trace being played.
    #[must_use]
    pub const fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Index of the step currently shown.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// The step currently shown.
    #[must_use]
    pub fn current(&self) -> Option<&Step> {
        self.trace.get(self.cursor)
    }

    /// Move to the next step and return it, or `None` at the end.
    pub fn advance(&mut self) -> Option<&Step> {
        if self.is_finished() {
            return None;
        }
        self.cursor += 1;
        self.trace.get(self.cursor)
    }

    /// Returns true once the final step is shown.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor + 1 >= self.trace.len()
    }

    /// Go back to the first step.
    pub const fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Discard the current trace and start over on `trace`.
    pub fn replace(&mut self, trace: Trace) {
        self.trace = trace;
        self.cursor = 0;
    }

    /// Log entries shown so far, with their indices.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Step)> {
        self.trace.steps().iter().take(self.cursor + 1).enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toposcope_trace::{Algorithm, InputMode, parse, run};

    fn session(text: &str) -> Session {
        let graph = parse(text, InputMode::List).unwrap();
        Session::new(run(&graph, Algorithm::Dfs).unwrap())
    }

    #[test]
    fn test_starts_on_first_step() {
        let session = session("a: b\nb:");
        assert_eq!(session.cursor(), 0);
        assert_eq!(
            session.current().unwrap().message,
            "Starting DFS-based Topological Sort"
        );
        assert!(!session.is_finished());
    }

    #[test]
    fn test_advance_stops_at_final_step() {
        let mut session = session("a: b\nb:");
        let len = session.trace().len();
        for _ in 1..len {
            assert!(session.advance().is_some());
        }
        assert!(session.is_finished());
        assert!(session.current().unwrap().is_final);
        assert!(session.advance().is_none());
        assert_eq!(session.cursor(), len - 1);
    }

    #[test]
    fn test_reset_returns_to_start() {
        let mut session = session("a: b\nb:");
        session.advance();
        session.advance();
        session.reset();
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.visible().count(), 1);
    }

    #[test]
    fn test_visible_grows_with_cursor() {
        let mut session = session("a: b\nb: c\nc:");
        session.advance();
        session.advance();
        let indices: Vec<usize> = session.visible().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_replace_discards_previous_trace() {
        let mut session = session("a: b\nb:");
        session.advance();
        let graph = parse("x: y\ny: x", InputMode::List).unwrap();
        let trace = run(&graph, Algorithm::Bfs).unwrap();
        session.replace(trace.clone());
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.trace(), &trace);
    }
}

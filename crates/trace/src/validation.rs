//! Pre-flight checks for parsed graphs.

use crate::Graph;
use std::fmt;

/// A problem that makes a graph unsuitable for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The graph has no nodes.
    Empty,
    /// The graph contains at least one directed cycle.
    Cyclic,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "graph has no nodes"),
            Self::Cyclic => write!(f, "graph contains a directed cycle"),
        }
    }
}

/// Result of graph validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the graph has a topological order.
    pub is_valid: bool,
    /// Problems found, if any.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a valid result.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            issues: vec![],
        }
    }

    /// Create an invalid result with issues.
    #[must_use]
    pub fn invalid(issues: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: false,
            issues,
        }
    }
}

impl Graph {
    /// Validate the graph structure.
    ///
    /// Checks that the graph is non-empty and acyclic. Sort runs do not need
    /// this: they report cycles through their trace. It exists for callers
    /// that want a verdict without replaying a run.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        let mut issues = Vec::new();

        if self.is_empty() {
            issues.push(ValidationIssue::Empty);
        } else if self.has_cycles() {
            issues.push(ValidationIssue::Cyclic);
        }

        if issues.is_empty() {
            ValidationResult::valid()
        } else {
            ValidationResult::invalid(issues)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_adjacency_list;

    #[test]
    fn test_validate_empty_graph() {
        let result = Graph::default().validate();
        assert!(!result.is_valid);
        assert_eq!(result.issues, [ValidationIssue::Empty]);
    }

    #[test]
    fn test_validate_valid_graph() {
        let graph = parse_adjacency_list("a: b\nb:").unwrap();
        let result = graph.validate();
        assert!(result.is_valid);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_validate_cyclic_graph() {
        let graph = parse_adjacency_list("a: b\nb: a").unwrap();
        let result = graph.validate();
        assert!(!result.is_valid);
        assert_eq!(result.issues, [ValidationIssue::Cyclic]);
    }
}

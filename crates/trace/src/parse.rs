//! Text parsers for adjacency-list and adjacency-matrix input.
//!
//! Both formats ignore blank lines and surrounding whitespace. Input that is
//! blank overall parses to an empty graph; rejecting it is left to the caller
//! (see [`crate::run`]).

use crate::{Error, Graph, NodeId, Result};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// Which text format the input is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InputMode {
    /// `<node>: <neighbor>,<neighbor>` lines.
    #[default]
    List,
    /// A header of node names followed by `<node> <bit> ...` rows.
    Matrix,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::List => "list",
            Self::Matrix => "matrix",
        };
        write!(f, "{s}")
    }
}

/// Parse `input` in the given mode.
///
/// # Errors
///
/// Returns [`Error::Format`] if the text does not follow the grammar of
/// `mode` or declares a self-loop.
pub fn parse(input: &str, mode: InputMode) -> Result<Graph> {
    match mode {
        InputMode::List => parse_adjacency_list(input),
        InputMode::Matrix => parse_adjacency_matrix(input),
    }
}

/// Non-blank lines, trimmed, paired with their 1-based line numbers.
fn content_lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Parse adjacency-list text.
///
/// Each non-blank line is `<node>: <comma-separated neighbors>`. Neighbors
/// never declared on the left of a colon become nodes with no successors,
/// placed after the declared nodes in the order they were first mentioned.
/// Empty tokens between commas are skipped.
///
/// # Errors
///
/// Returns [`Error::Format`] when a line lacks a colon, names no node,
/// declares a node twice, contains a stray colon in its neighbor list, or
/// lists the declaring node as its own neighbor.
pub fn parse_adjacency_list(input: &str) -> Result<Graph> {
    let mut adjacency: IndexMap<NodeId, Vec<NodeId>> = IndexMap::new();
    let mut referenced: IndexSet<NodeId> = IndexSet::new();

    for (line_no, line) in content_lines(input) {
        let Some((node, neighbors)) = line.split_once(':') else {
            return Err(Error::format_at(
                line_no,
                format!("expected '<node>: <neighbors>', found '{line}'"),
            ));
        };

        let node = node.trim();
        if node.is_empty() {
            return Err(Error::format_at(line_no, "missing node name before ':'"));
        }
        if adjacency.contains_key(node) {
            return Err(Error::format_at(
                line_no,
                format!("node '{node}' is declared more than once"),
            ));
        }

        let mut successors = Vec::new();
        for neighbor in neighbors.split(',').map(str::trim) {
            if neighbor.is_empty() {
                continue;
            }
            if neighbor.contains(':') {
                return Err(Error::format_at(
                    line_no,
                    format!("unexpected ':' in neighbor '{neighbor}'"),
                ));
            }
            if neighbor == node {
                return Err(Error::format_at(
                    line_no,
                    format!("self-loop on node '{node}' is not allowed"),
                ));
            }
            referenced.insert(neighbor.to_string());
            successors.push(neighbor.to_string());
        }

        adjacency.insert(node.to_string(), successors);
    }

    for target in referenced {
        adjacency.entry(target).or_default();
    }

    let graph = Graph::from_adjacency(adjacency);
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Parsed adjacency list"
    );
    Ok(graph)
}

/// Parse adjacency-matrix text.
///
/// The first non-blank line lists the node names; it fixes both the key
/// order and the column order. Every following line is a row
/// `<node> <bit> <bit> ...` where `1` marks an edge from the row node to
/// the node of that column. Short rows are treated as zero-padded; columns
/// past the header width are ignored.
///
/// # Errors
///
/// Returns [`Error::Format`] when there is a header but no rows, the header
/// repeats a name, a row names an unknown node or repeats a row, a bit is
/// not `0` or `1`, or a row marks an edge to itself.
pub fn parse_adjacency_matrix(input: &str) -> Result<Graph> {
    let mut lines = content_lines(input);
    let Some((header_line, header)) = lines.next() else {
        return Ok(Graph::default());
    };

    let columns: Vec<&str> = header.split_whitespace().collect();
    let mut adjacency: IndexMap<NodeId, Vec<NodeId>> = IndexMap::with_capacity(columns.len());
    for &column in &columns {
        if adjacency.insert(column.to_string(), Vec::new()).is_some() {
            return Err(Error::format_at(
                header_line,
                format!("node '{column}' appears twice in the header"),
            ));
        }
    }

    let mut seen_rows = HashSet::new();
    let mut row_count = 0_usize;
    for (line_no, line) in lines {
        row_count += 1;
        let mut parts = line.split_whitespace();
        let Some(row_node) = parts.next() else {
            continue;
        };
        let Some(row_index) = adjacency.get_index_of(row_node) else {
            return Err(Error::format_at(
                line_no,
                format!("row node '{row_node}' is not in the header"),
            ));
        };
        if !seen_rows.insert(row_index) {
            return Err(Error::format_at(
                line_no,
                format!("row for node '{row_node}' appears more than once"),
            ));
        }

        for (column, bit) in parts.enumerate() {
            if column >= columns.len() {
                warn!(
                    line = line_no,
                    row = row_node,
                    width = columns.len(),
                    "Ignoring matrix columns beyond the header"
                );
                break;
            }
            match bit {
                "0" => {}
                "1" if column == row_index => {
                    return Err(Error::format_at(
                        line_no,
                        format!("self-loop on node '{row_node}' is not allowed"),
                    ));
                }
                "1" => adjacency[row_index].push(columns[column].to_string()),
                other => {
                    return Err(Error::format_at(
                        line_no,
                        format!("expected 0 or 1, found '{other}'"),
                    ));
                }
            }
        }
    }

    if row_count == 0 {
        return Err(Error::format_at(
            header_line,
            "expected a header line followed by at least one row",
        ));
    }

    let graph = Graph::from_adjacency(adjacency);
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Parsed adjacency matrix"
    );
    Ok(graph)
}

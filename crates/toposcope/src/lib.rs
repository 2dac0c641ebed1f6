//! toposcope - step-by-step topological sort player
//!
//! Front-end for [`toposcope_trace`]: reads a graph, records a depth-first or
//! Kahn's sort over it and replays the trace in the terminal, either all at
//! once, on a timer, or one step per keypress.
//!
//! - [`session::Session`] is a cursor over a recorded trace
//! - [`playback::Player`] drives a session from a tokio task
//! - [`render`] turns steps into text

/// CLI argument parsing, errors and exit codes.
pub mod cli;
/// Subcommand implementations.
pub mod commands;
pub mod playback;
pub mod render;
pub mod session;
/// Tracing setup for the binary.
pub mod tracing;

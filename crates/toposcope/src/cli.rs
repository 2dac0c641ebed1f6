use crate::tracing::{LogLevel, TracingFormat};
use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{Diagnostic, Report};
use serde::Serialize;
use std::io::{self, Write};
use thiserror::Error;
use toposcope_trace::{Algorithm, InputMode, SortFailure};

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// CLI, input or configuration error exit code
pub const EXIT_CLI: i32 = 2;
/// Sort failure (cycle) or unexpected runtime error exit code
pub const EXIT_SORT: i32 = 3;

/// Default autoplay delay between steps, in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 800;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// Input or configuration error (exit code 2)
    #[error("Input/configuration error: {message}")]
    #[diagnostic(code(toposcope::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// The graph has no topological order (exit code 3)
    #[error("Sort failed: {message}")]
    #[diagnostic(code(toposcope::cli::sort))]
    Sort {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Other unexpected error (exit code 3)
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(toposcope::cli::other))]
    Other {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new sort error with help text
    #[must_use]
    pub fn sort_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Sort {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: None,
        }
    }

    const fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Sort { .. } => "sort",
            Self::Other { .. } => "other",
        }
    }
}

/// Parse and empty-graph errors are problems with the user's input.
impl From<toposcope_trace::Error> for CliError {
    fn from(err: toposcope_trace::Error) -> Self {
        match err {
            toposcope_trace::Error::Format { .. } => Self::config_with_help(
                err.to_string(),
                "Use `a: b,c` lines, or a header of node names then `<node> 0 1 ...` rows",
            ),
            toposcope_trace::Error::EmptyGraph => Self::config_with_help(
                err.to_string(),
                "Declare at least one node, for example `a:`",
            ),
        }
    }
}

impl From<SortFailure> for CliError {
    fn from(failure: SortFailure) -> Self {
        Self::sort_with_help(
            failure.to_string(),
            "Remove one edge of the cycle to make the graph sortable",
        )
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Sort { .. } | CliError::Other { .. } => EXIT_SORT,
    }
}

/// Render error appropriately based on JSON flag
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        let error_envelope = ErrorEnvelope::new(serde_json::json!({
            "code": err.code(),
            "message": err.to_string()
        }));

        match serde_json::to_string(&error_envelope) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error serializing error response"),
        }
    } else {
        let report = Report::new(err.clone());
        eprintln!("{report:?}");
        let _ = io::stderr().flush();
    }
}

/// Success response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct OkEnvelope<T> {
    /// Status indicator - always "ok" for success
    pub status: &'static str,
    /// The actual data payload
    pub data: T,
}

impl<T> OkEnvelope<T> {
    /// Create a new success envelope
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope<E> {
    /// Status indicator - always "error" for failures
    pub status: &'static str,
    /// The error details
    pub error: E,
}

impl<E> ErrorEnvelope<E> {
    /// Create a new error envelope
    #[must_use]
    pub const fn new(error: E) -> Self {
        Self {
            status: "error",
            error,
        }
    }
}

/// Input format accepted on the command line.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum ModeArg {
    /// `node: n1,n2` lines
    #[default]
    List,
    /// Header row of names, then `<node> 0 1 ...` rows
    Matrix,
}

impl From<ModeArg> for InputMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::List => Self::List,
            ModeArg::Matrix => Self::Matrix,
        }
    }
}

/// Sort engine selectable on the command line.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum AlgorithmArg {
    /// Depth-first search
    #[default]
    Dfs,
    /// Breadth-first search (Kahn's algorithm)
    #[value(alias = "kahn")]
    Bfs,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(algorithm: AlgorithmArg) -> Self {
        match algorithm {
            AlgorithmArg::Dfs => Self::Dfs,
            AlgorithmArg::Bfs => Self::Bfs,
        }
    }
}

/// Step-by-step topological sort player.
///
/// Parses a directed graph, runs a depth-first or Kahn's topological sort
/// over it and replays every step of the run.
#[derive(Parser, Debug)]
#[command(name = "toposcope")]
#[command(about = "Step-by-step topological sort player")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    /// Emit JSON instead of text.
    #[arg(long, global = true, help = "Emit JSON instead of text")]
    pub json: bool,

    /// Log line format on stderr.
    #[arg(
        long = "log-format",
        global = true,
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,
}

/// Where to read the graph from and how to read it.
#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Graph file, or `-` for stdin.
    #[arg(value_name = "FILE", default_value = "-")]
    pub input: String,

    /// Input format.
    #[arg(short, long, value_enum, default_value_t)]
    pub mode: ModeArg,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a sort run step by step.
    #[command(about = "Play a sort run step by step")]
    Run {
        /// Graph source.
        #[command(flatten)]
        graph: GraphArgs,

        /// Sort engine to run.
        #[arg(short, long, value_enum, default_value_t)]
        algorithm: AlgorithmArg,

        /// Delay between autoplayed steps.
        #[arg(
            long = "delay-ms",
            env = "TOPOSCOPE_DELAY_MS",
            default_value_t = DEFAULT_DELAY_MS
        )]
        delay_ms: u64,

        /// Step manually with commands read from stdin.
        #[arg(
            short,
            long,
            help = "Step manually: enter/n = next, p = pause/resume autoplay, r = reset, q = quit"
        )]
        interactive: bool,
    },

    /// Print every step of a sort run at once.
    #[command(about = "Print every step of a sort run at once")]
    Trace {
        /// Graph source.
        #[command(flatten)]
        graph: GraphArgs,

        /// Sort engine to run.
        #[arg(short, long, value_enum, default_value_t)]
        algorithm: AlgorithmArg,
    },

    /// Report whether a graph can be sorted.
    #[command(about = "Report node and edge counts and whether the graph is acyclic")]
    Check {
        /// Graph source.
        #[command(flatten)]
        graph: GraphArgs,
    },

    /// Print a random acyclic graph.
    #[command(about = "Print a random acyclic graph in adjacency-list form")]
    Generate {
        /// Number of nodes.
        #[arg(short, long, default_value_t = 8)]
        nodes: usize,

        /// Number of edges to attempt.
        #[arg(short, long, default_value_t = 10)]
        edges: usize,

        /// Seed for reproducible output.
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

/// Parse command-line arguments, exiting on `--help` or invalid usage.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code_for(&CliError::config_with_help("bad", "fix it")),
            EXIT_CLI
        );
        assert_eq!(
            exit_code_for(&CliError::sort_with_help("cycle", "fix it")),
            EXIT_SORT
        );
        assert_eq!(exit_code_for(&CliError::other("boom")), EXIT_SORT);
    }

    #[test]
    fn test_format_error_maps_to_config() {
        let err = CliError::from(toposcope_trace::Error::format_at(2, "self-loop on node a"));
        assert!(matches!(err, CliError::Config { help: Some(_), .. }));
        assert!(err.to_string().contains("on line 2"));
    }

    #[test]
    fn test_empty_graph_maps_to_config() {
        let err = CliError::from(toposcope_trace::Error::EmptyGraph);
        assert_eq!(exit_code_for(&err), EXIT_CLI);
    }

    #[test]
    fn test_sort_failure_maps_to_sort() {
        let failure = SortFailure::Cycle {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        let err = CliError::from(failure);
        assert_eq!(exit_code_for(&err), EXIT_SORT);
        assert!(err.to_string().contains("a → b → a"));
    }

    #[test]
    fn test_parse_run_defaults() {
        let cli = Cli::try_parse_from(["toposcope", "run", "graph.txt"]).unwrap();
        assert_eq!(cli.level, LogLevel::Warn);
        assert!(!cli.json);
        match cli.command {
            Commands::Run {
                graph,
                algorithm,
                interactive,
                ..
            } => {
                assert_eq!(graph.input, "graph.txt");
                assert_eq!(graph.mode, ModeArg::List);
                assert_eq!(algorithm, AlgorithmArg::Dfs);
                assert!(!interactive);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_trace_with_options() {
        let cli = Cli::try_parse_from([
            "toposcope",
            "trace",
            "-",
            "--mode",
            "matrix",
            "-a",
            "kahn",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Trace { graph, algorithm } => {
                assert_eq!(graph.input, "-");
                assert_eq!(InputMode::from(graph.mode), InputMode::Matrix);
                assert_eq!(Algorithm::from(algorithm), Algorithm::Bfs);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_generate() {
        let cli =
            Cli::try_parse_from(["toposcope", "generate", "--nodes", "4", "--seed", "9"]).unwrap();
        match cli.command {
            Commands::Generate { nodes, edges, seed } => {
                assert_eq!(nodes, 4);
                assert_eq!(edges, 10);
                assert_eq!(seed, Some(9));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_log_format() {
        let cli = Cli::try_parse_from(["toposcope", "check", "--log-format", "json"]).unwrap();
        assert_eq!(cli.log_format, TracingFormat::Json);
        assert!(Cli::try_parse_from(["toposcope", "check", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        assert!(Cli::try_parse_from(["toposcope", "trace", "-a", "dijkstra"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

//! Subcommand implementations.
//!
//! Synchronous commands return the text to print. `run` prints as frames
//! arrive and therefore writes to stdout itself.

use crate::cli::{CliError, GraphArgs, OkEnvelope};
use crate::playback::{Frame, PlaybackConfig, Player};
use crate::render;
use crate::session::Session;
use serde::Serialize;
use std::io::{self, Read};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use toposcope_trace::generate::{random_dag, seeded_dag};
use toposcope_trace::{Algorithm, Graph, Trace, ValidationIssue, parse};
use tracing::{debug, info, instrument, warn};

/// Read graph text from a file, or from stdin for `-`.
///
/// # Errors
///
/// Returns a configuration error if the source cannot be read.
pub fn read_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(|e| {
            CliError::config_with_help(
                format!("Failed to read graph from stdin: {e}"),
                "Pipe a graph in, or pass a file path instead of `-`",
            )
        })?;
        return Ok(text);
    }
    std::fs::read_to_string(input).map_err(|e| {
        CliError::config_with_help(
            format!("Failed to read graph file {input}: {e}"),
            "Check the path and file permissions",
        )
    })
}

/// Read and parse the graph named by `args`.
///
/// # Errors
///
/// Returns a configuration error for unreadable or malformed input.
pub fn load_graph(args: &GraphArgs) -> Result<Graph, CliError> {
    let text = read_input(&args.input)?;
    let mode = args.mode.into();
    let graph = parse(&text, mode)?;
    debug!(
        input = %args.input,
        mode = %mode,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Loaded graph"
    );
    Ok(graph)
}

fn record(graph: &Graph, algorithm: Algorithm) -> Result<Trace, CliError> {
    Ok(toposcope_trace::run(graph, algorithm)?)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string(value)
        .map_err(|e| CliError::other(format!("Failed to serialize output: {e}")))
}

/// Record a whole trace and render it.
///
/// Returns the rendered trace together with the sort failure, if any, so the
/// caller can print the trace before reporting the failure.
///
/// # Errors
///
/// Returns an error if the graph cannot be loaded or is empty.
#[instrument(skip(args), fields(input = %args.input))]
pub fn trace(
    args: &GraphArgs,
    algorithm: Algorithm,
    json: bool,
) -> Result<(String, Option<CliError>), CliError> {
    let graph = load_graph(args)?;
    let trace = record(&graph, algorithm)?;
    let failure = trace.failure().map(CliError::from);

    let output = if json {
        to_json(&OkEnvelope::new(&trace))?
    } else {
        render::render_trace(&trace)
    };
    Ok((output, failure))
}

#[derive(Debug, Serialize)]
struct CheckReport {
    nodes: usize,
    edges: usize,
    acyclic: bool,
}

/// Report node and edge counts and whether the graph can be sorted.
///
/// # Errors
///
/// Returns a configuration error for unreadable, malformed or empty input
/// and a sort error if the graph is cyclic.
#[instrument(skip(args), fields(input = %args.input))]
pub fn check(args: &GraphArgs, json: bool) -> Result<String, CliError> {
    let graph = load_graph(args)?;
    let validation = graph.validate();
    if validation.issues.contains(&ValidationIssue::Empty) {
        return Err(toposcope_trace::Error::EmptyGraph.into());
    }

    let report = CheckReport {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        acyclic: validation.is_valid,
    };
    info!(
        nodes = report.nodes,
        edges = report.edges,
        acyclic = report.acyclic,
        "Checked graph"
    );

    if !report.acyclic {
        return Err(CliError::sort_with_help(
            format!(
                "graph with {} nodes and {} edges contains a cycle",
                report.nodes, report.edges
            ),
            "Run `toposcope trace` with the DFS engine to see the cycle path",
        ));
    }

    if json {
        to_json(&OkEnvelope::new(&report))
    } else {
        Ok(format!(
            "nodes: {}\nedges: {}\nacyclic: yes",
            report.nodes, report.edges
        ))
    }
}

/// Produce a random DAG in adjacency-list form.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub fn generate(
    nodes: usize,
    edges: usize,
    seed: Option<u64>,
    json: bool,
) -> Result<String, CliError> {
    let graph = match seed {
        Some(seed) => seeded_dag(nodes, edges, seed),
        None => random_dag(nodes, edges, &mut rand::rng()),
    };
    if graph.edge_count() < edges {
        debug!(
            requested = edges,
            generated = graph.edge_count(),
            "Generated fewer edges than requested"
        );
    }

    if json {
        to_json(&OkEnvelope::new(&graph))
    } else {
        Ok(graph.to_string())
    }
}

/// Options for [`run`].
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Sort engine.
    pub algorithm: Algorithm,
    /// Autoplay delay between steps.
    pub delay: Duration,
    /// Step manually from stdin instead of autoplaying.
    pub interactive: bool,
    /// Print frames as JSON lines.
    pub json: bool,
}

enum Input {
    Step,
    TogglePause,
    Reset,
    Quit,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "" | "n" | "next" => Self::Step,
            "p" | "pause" => Self::TogglePause,
            "r" | "reset" => Self::Reset,
            "q" | "quit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

async fn next_line(lines: &mut Option<Lines<BufReader<Stdin>>>) -> io::Result<Option<String>> {
    match lines {
        Some(lines) => lines.next_line().await,
        None => std::future::pending().await,
    }
}

#[allow(clippy::print_stdout)]
fn show(frame: &Frame, algorithm: Algorithm, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", to_json(frame)?);
    } else {
        println!("{}\n", render::render_frame(frame, algorithm));
    }
    Ok(())
}

/// Play a sort run step by step.
///
/// Autoplay stops after the final step. In interactive mode commands are
/// read from stdin until `q` or end of input. Ctrl-C ends playback early.
///
/// # Errors
///
/// Returns a configuration error for bad input and a sort error if the run
/// ended in a cycle.
#[instrument(skip(args, options), fields(input = %args.input, algorithm = %options.algorithm))]
pub async fn run(args: &GraphArgs, options: RunOptions) -> Result<(), CliError> {
    if options.interactive && args.input == "-" {
        return Err(CliError::config_with_help(
            "interactive mode reads commands from stdin",
            "Pass the graph as a file path",
        ));
    }

    let graph = load_graph(args)?;
    let trace = record(&graph, options.algorithm)?;
    let failure = trace.failure();

    let config = PlaybackConfig {
        delay: options.delay,
        autoplay: !options.interactive,
    };
    let (player, mut frames) = Player::start(Session::new(trace), config);
    let mut playing = config.autoplay;

    // The first step is always on screen before any command is read.
    if let Some(first) = frames.recv().await {
        if let Err(e) = show(&first, options.algorithm, options.json) {
            player.cancel();
            return Err(e);
        }
    }
    let mut commands = options
        .interactive
        .then(|| BufReader::new(tokio::io::stdin()).lines());

    let result = loop {
        tokio::select! {
            frame = frames.recv() => {
                let Some(frame) = frame else { break Ok(()) };
                if let Err(e) = show(&frame, options.algorithm, options.json) {
                    break Err(e);
                }
                if frame.step.is_final && !options.interactive {
                    break Ok(());
                }
            }
            line = next_line(&mut commands) => match line {
                Ok(Some(line)) => match Input::parse(&line) {
                    Input::Step => player.step(),
                    Input::TogglePause => {
                        playing = !playing;
                        if playing { player.resume() } else { player.pause() }
                    }
                    Input::Reset => player.reset(),
                    Input::Quit => break Ok(()),
                    Input::Unknown(command) => {
                        warn!(%command, "Unknown command; use n, p, r or q");
                    }
                },
                Ok(None) => break Ok(()),
                Err(e) => break Err(CliError::other(format!("Failed to read command: {e}"))),
            },
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "Failed to listen for Ctrl-C");
                }
                info!("Playback interrupted");
                break Ok(());
            }
        }
    };

    player.cancel();
    let session = player
        .finish()
        .await
        .map_err(|e| CliError::other(format!("Playback task failed: {e}")))?;
    debug!(
        cursor = session.cursor(),
        finished = session.is_finished(),
        "Playback stopped"
    );

    result?;
    match failure {
        Some(failure) if session.is_finished() => Err(failure.into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ModeArg;
    use std::io::Write;

    fn graph_file(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    fn args(file: &tempfile::NamedTempFile, mode: ModeArg) -> GraphArgs {
        GraphArgs {
            input: file.path().to_string_lossy().into_owned(),
            mode,
        }
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let args = GraphArgs {
            input: "/definitely/not/here.txt".to_string(),
            mode: ModeArg::List,
        };
        assert!(matches!(load_graph(&args), Err(CliError::Config { .. })));
    }

    #[test]
    fn test_trace_text_for_dag() {
        let file = graph_file("0: 1,2\n1: 3\n2: 3\n3: 4\n4:");
        let (output, failure) = trace(&args(&file, ModeArg::List), Algorithm::Dfs, false).unwrap();
        assert!(failure.is_none());
        assert!(output.starts_with("Step 1: Starting DFS-based Topological Sort"));
        assert!(output.ends_with("Final Topological Order (DFS): 0 → 2 → 1 → 3 → 4"));
    }

    #[test]
    fn test_trace_json_carries_outcome() {
        let file = graph_file("a: b\nb: a");
        let (output, failure) = trace(&args(&file, ModeArg::List), Algorithm::Bfs, true).unwrap();
        assert!(matches!(failure, Some(CliError::Sort { .. })));

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["data"]["outcome"]["status"], "incomplete");
        assert_eq!(value["data"]["outcome"]["total"], 2);
    }

    #[test]
    fn test_trace_rejects_empty_graph() {
        let file = graph_file("\n\n");
        let err = trace(&args(&file, ModeArg::List), Algorithm::Dfs, false).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn test_check_matrix_dag() {
        let file = graph_file("0 1 2\n0 0 1 0\n1 0 0 1\n2 0 0 0");
        let output = check(&args(&file, ModeArg::Matrix), false).unwrap();
        assert_eq!(output, "nodes: 3\nedges: 2\nacyclic: yes");
    }

    #[test]
    fn test_check_cycle_is_sort_error() {
        let file = graph_file("a: b\nb: c\nc: a");
        let err = check(&args(&file, ModeArg::List), false).unwrap_err();
        assert!(matches!(err, CliError::Sort { .. }));
    }

    #[test]
    fn test_generate_is_reproducible_and_parses() {
        let first = generate(6, 8, Some(11), false).unwrap();
        assert_eq!(first, generate(6, 8, Some(11), false).unwrap());

        let graph = parse(&first, toposcope_trace::InputMode::List).unwrap();
        assert_eq!(graph.node_count(), 6);
        assert!(!graph.has_cycles());
    }

    #[test]
    fn test_input_commands() {
        assert!(matches!(Input::parse(""), Input::Step));
        assert!(matches!(Input::parse(" n "), Input::Step));
        assert!(matches!(Input::parse("p"), Input::TogglePause));
        assert!(matches!(Input::parse("r"), Input::Reset));
        assert!(matches!(Input::parse("q"), Input::Quit));
        assert!(matches!(Input::parse("x"), Input::Unknown(_)));
    }

    #[tokio::test]
    async fn test_run_autoplays_to_completion() {
        let file = graph_file("a: b\nb:");
        let options = RunOptions {
            algorithm: Algorithm::Bfs,
            delay: Duration::ZERO,
            interactive: false,
            json: true,
        };
        run(&args(&file, ModeArg::List), options).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_reports_cycle_after_playback() {
        let file = graph_file("a: b\nb: a");
        let options = RunOptions {
            algorithm: Algorithm::Dfs,
            delay: Duration::ZERO,
            interactive: false,
            json: true,
        };
        let err = run(&args(&file, ModeArg::List), options).await.unwrap_err();
        assert!(err.to_string().contains("a → b → a"));
    }

    #[tokio::test]
    async fn test_interactive_requires_file_input() {
        let args = GraphArgs {
            input: "-".to_string(),
            mode: ModeArg::List,
        };
        let options = RunOptions {
            algorithm: Algorithm::Dfs,
            delay: Duration::ZERO,
            interactive: true,
            json: false,
        };
        assert!(matches!(
            run(&args, options).await,
            Err(CliError::Config { .. })
        ));
    }
}

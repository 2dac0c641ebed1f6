//! toposcope CLI entry point

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::time::Duration;
use toposcope::cli::{self, CliError, Commands, EXIT_OK, exit_code_for, render_error};
use toposcope::commands::{self, RunOptions};
use toposcope::tracing::{TracingConfig, init_tracing};

/// Main entry point - determines sync vs async execution path
fn main() {
    // Tracing may not be usable during a panic, so report it directly.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();
    let json = cli.json;

    if let Err(e) = init_tracing(TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        filter: None,
    }) {
        eprintln!("Warning: {e}");
    }

    let result = if requires_async_runtime(&cli) {
        run_with_tokio(cli)
    } else {
        run_sync(cli)
    };

    let exit_code = match result {
        Ok(()) => EXIT_OK,
        Err(err) => {
            render_error(&err, json);
            exit_code_for(&err)
        }
    };
    std::process::exit(exit_code);
}

/// Only playback needs timers, signals and async stdin.
const fn requires_async_runtime(cli: &cli::Cli) -> bool {
    match &cli.command {
        Commands::Run { .. } => true,
        Commands::Trace { .. } | Commands::Check { .. } | Commands::Generate { .. } => false,
    }
}

/// Create tokio runtime and run async path
fn run_with_tokio(cli: cli::Cli) -> Result<(), CliError> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::other(format!("Failed to create tokio runtime: {e}")))?;

    rt.block_on(run_async(cli))
}

async fn run_async(cli: cli::Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Run {
            graph,
            algorithm,
            delay_ms,
            interactive,
        } => {
            let options = RunOptions {
                algorithm: algorithm.into(),
                delay: Duration::from_millis(delay_ms),
                interactive,
                json: cli.json,
            };
            commands::run(&graph, options).await
        }
        _ => Err(CliError::other(
            "Internal error: sync command reached async path",
        )),
    }
}

/// Run synchronous commands without tokio runtime
fn run_sync(cli: cli::Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Trace { graph, algorithm } => {
            let (output, failure) = commands::trace(&graph, algorithm.into(), cli.json)?;
            println!("{output}");
            failure.map_or(Ok(()), Err)
        }
        Commands::Check { graph } => {
            println!("{}", commands::check(&graph, cli.json)?);
            Ok(())
        }
        Commands::Generate { nodes, edges, seed } => {
            println!("{}", commands::generate(nodes, edges, seed, cli.json)?);
            Ok(())
        }
        Commands::Run { .. } => Err(CliError::other(
            "Internal error: async command reached sync path",
        )),
    }
}

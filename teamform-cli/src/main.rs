//! teamform-cli: command-line interface for the teamform-core engine.
//!
//! Lets a human or an AI agent exercise the full engine over JSON on
//! stdin/stdout, without standing up a server.
//!
//! # Commands
//!
//! - `solve`: run a solve to completion, streaming progress to stderr.
//! - `evaluate`: grade an existing assignment without invoking the solver.
//! - `validate`: parse and normalize a payload, reporting errors only.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use teamform_core::models::{ApiInput, ConstraintKind, EvaluateInput, OutputRecord};
use teamform_core::normalizer::{normalize_discrete, normalize_numeric};
use teamform_core::solver;
use teamform_core::team_sizes::derive_team_sizes;

#[derive(Parser)]
#[command(name = "teamform-cli")]
#[command(version = "0.1.0")]
#[command(about = "teamform-core engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a solve to completion.
    Solve {
        /// Input JSON file path (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Read input from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Grade an existing assignment without invoking the solver.
    Evaluate {
        /// Input JSON file path (participants must carry `team_number`)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Read input from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Parse and normalize a payload without invoking the solver.
    Validate {
        /// Input JSON file path
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Read input from stdin instead of a file
        #[arg(long)]
        stdin: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            input,
            stdin,
            pretty,
        } => cmd_solve(input, stdin, pretty),
        Commands::Evaluate {
            input,
            stdin,
            pretty,
        } => cmd_evaluate(input, stdin, pretty),
        Commands::Validate { input, stdin } => cmd_validate(input, stdin),
    }
}

fn read_input(file: Option<PathBuf>, use_stdin: bool) -> Result<String> {
    if use_stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read from stdin")?;
        Ok(buffer)
    } else if let Some(path) = file {
        fs::read_to_string(&path).with_context(|| format!("failed to read file: {path:?}"))
    } else {
        anyhow::bail!("either provide an input file or use --stdin")
    }
}

fn cmd_solve(input: Option<PathBuf>, stdin: bool, pretty: bool) -> Result<()> {
    let json_str = read_input(input, stdin)?;
    let api_input: ApiInput =
        serde_json::from_str(&json_str).context("failed to parse input JSON")?;

    let cancel = Arc::new(AtomicBool::new(false));
    let (subscriber, handle) = solver::solve(api_input, cancel);

    // Progress records go to stderr as they arrive; the terminal record is
    // the only thing printed to stdout.
    let terminal = loop {
        if let Some(progress) = subscriber.poll_progress() {
            eprintln!(
                "progress: solution #{} objective={} wall_time={:.2}s",
                progress.solution_count, progress.objective_value, progress.wall_time
            );
        }
        if let Some(record) = subscriber.recv_terminal_timeout(std::time::Duration::from_millis(50)) {
            break record;
        }
    };
    handle.join().expect("solver worker thread panicked");

    let rendered = if pretty {
        serde_json::to_string_pretty(&terminal)?
    } else {
        serde_json::to_string(&terminal)?
    };
    println!("{rendered}");

    if matches!(terminal, OutputRecord::Error(_)) {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_evaluate(input: Option<PathBuf>, stdin: bool, pretty: bool) -> Result<()> {
    let json_str = read_input(input, stdin)?;
    let evaluate_input: EvaluateInput =
        serde_json::from_str(&json_str).context("failed to parse input JSON")?;

    let rows = solver::evaluate_assignment(&evaluate_input).context("failed to evaluate")?;
    let rendered = if pretty {
        serde_json::to_string_pretty(&rows)?
    } else {
        serde_json::to_string(&rows)?
    };
    println!("{rendered}");
    Ok(())
}

fn cmd_validate(input: Option<PathBuf>, stdin: bool) -> Result<()> {
    let json_str = read_input(input, stdin)?;
    let api_input: ApiInput =
        serde_json::from_str(&json_str).context("failed to parse input JSON")?;

    solver::validation::validate_input(&api_input)
        .map_err(|e| anyhow::anyhow!("{}: {}", e.kind(), e))?;
    let plan = derive_team_sizes(
        api_input.participants.len(),
        api_input.target_team_size,
        api_input.less_than_target,
    )
    .map_err(|e| anyhow::anyhow!("{}: {}", e.kind(), e))?;

    for spec in &api_input.constraints {
        match spec.kind {
            ConstraintKind::ClusterNumeric => {
                normalize_numeric(&api_input.participants, &spec.attribute)
                    .map_err(|e| anyhow::anyhow!("{}: {}", e.kind(), e))?;
            }
            _ => {
                normalize_discrete(&api_input.participants, &spec.attribute)
                    .map_err(|e| anyhow::anyhow!("{}: {}", e.kind(), e))?;
            }
        }
    }

    println!(
        "ok: {} participants, {} teams, sizes {:?}",
        api_input.participants.len(),
        plan.num_teams,
        plan.sizes()
    );
    Ok(())
}

#![forbid(unsafe_code)]

mod cmd;
mod config;
mod output;

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "schedgraph: SCCs, topological order and critical paths for dependency graphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ./schedgraph.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (same as `--format json`).
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Analyze a dataset",
        long_about = "Condense SCCs, order the condensation, then compute shortest distances and the critical path from the source.",
        after_help = "EXAMPLES:\n    # Analyze from the dataset's own source\n    schedgraph analyze data/small/cyclic_1.json\n\n    # Pick the source and SCC algorithm\n    schedgraph analyze data/medium/multi_scc_1.json --source 3 --scc kosaraju\n\n    # Emit machine-readable output\n    schedgraph analyze data/small/dag_1.json --json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "List strongly connected components",
        after_help = "EXAMPLES:\n    # Tarjan (default)\n    schedgraph sccs data/medium/multi_scc_1.json\n\n    # Kosaraju\n    schedgraph sccs data/medium/multi_scc_1.json --scc kosaraju"
    )]
    Sccs(cmd::sccs::SccsArgs),

    #[command(
        about = "Write the standard synthetic datasets",
        after_help = "EXAMPLES:\n    # Write into ./data\n    schedgraph generate\n\n    # Different directory and seed\n    schedgraph generate --out /tmp/graphs --seed 7"
    )]
    Generate(cmd::generate::GenerateArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SCHEDGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "schedgraph=debug,info"
        } else {
            "schedgraph=info,warn"
        })
    });

    let format = env::var("SCHEDGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so JSON on stdout stays parseable.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn dispatch(cli: &Cli, config: &config::Config, output: OutputMode) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Analyze(args) => cmd::analyze::run_analyze(args, &config.analysis, output),
        Commands::Sccs(args) => cmd::sccs::run_sccs(args, &config.analysis, output),
        Commands::Generate(args) => cmd::generate::run_generate(args, output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let config = env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| config::load_config(cli.config.as_deref(), &cwd));
    let output = resolve_output_mode(
        cli.format,
        cli.json,
        config.as_ref().ok().and_then(|c| c.output.format),
    );

    match config.and_then(|config| dispatch(&cli, &config, output)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(render_err) = render_error(output, &CliError::from_anyhow(&err)) {
                eprintln!("error: {err:#} (while rendering: {render_err})");
            }
            ExitCode::FAILURE
        }
    }
}

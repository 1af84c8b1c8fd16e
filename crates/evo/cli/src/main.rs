//! evogrid - exact factor grids and evaluation tensors from the command line
//!
//! Subcommands:
//! - `factors`: build and print the grids of the active parameters
//! - `evaluate`: aggregate verification outcomes into per-source tensors

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;
mod writer;

use commands::{EvaluateArgs, FactorsArgs};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "evogrid")]
#[command(about = "EvoGrid - factor grids and evaluation tensors for benchmark refinement", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table", global = true)]
    output: OutputFormat,

    /// Log level when RUST_LOG is unset
    #[arg(long, env = "EVOGRID_LOG", default_value = "info", global = true)]
    log_level: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the level grid of each active parameter
    Factors(FactorsArgs),

    /// Aggregate verification outcomes for one iteration
    Evaluate(EvaluateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        cli.log_level.clone()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Factors(args) => commands::factors(args, cli.output),
        Commands::Evaluate(args) => commands::evaluate(args, cli.output),
    }
}

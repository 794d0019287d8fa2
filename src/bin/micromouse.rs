//! Micromouse CLI - Train and evaluate Q-learning maze agents

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "micromouse")]
#[command(version, about = "Q-learning micromouse trainer", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a learner in a maze
    Train(Box<micromouse::cli::commands::train::TrainArgs>),

    /// Run a trained learner greedily and report path length
    Evaluate(micromouse::cli::commands::evaluate::EvaluateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Train(args) => micromouse::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => micromouse::cli::commands::evaluate::execute(args),
    }
}

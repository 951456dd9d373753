//! gomoku-rl CLI - Q-learning simulation harness for five-in-a-row
//!
//! This CLI provides a unified interface for:
//! - Training a linear-approximation Q-learning agent over simulated episodes
//! - Evaluating a trained agent greedily, with an optional random baseline
//! - Inspecting saved agent snapshots

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gomoku-rl")]
#[command(version, about = "Q-learning simulation harness for Gomoku", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-learning agent
    Train(gomoku_rl::cli::commands::train::TrainArgs),

    /// Evaluate a trained agent
    Evaluate(gomoku_rl::cli::commands::evaluate::EvaluateArgs),

    /// Inspect a trained agent snapshot
    Inspect(gomoku_rl::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => gomoku_rl::cli::commands::train::execute(args),
        Commands::Evaluate(args) => gomoku_rl::cli::commands::evaluate::execute(args),
        Commands::Inspect(args) => gomoku_rl::cli::commands::inspect::execute(args),
    }
}

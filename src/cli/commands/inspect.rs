//! Inspect command - print snapshot metadata and the strongest weights

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::output::{format_number, print_kv, print_section, print_subsection},
    q_learning::SavedAgent,
};

#[derive(Parser, Debug)]
#[command(about = "Inspect a trained agent snapshot")]
pub struct InspectArgs {
    /// Path to a trained agent snapshot
    pub agent: PathBuf,

    /// Number of top-weight features to show
    #[arg(long, short = 'n', default_value_t = 20)]
    pub top: usize,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let saved = SavedAgent::load_from_file(&args.agent)?;

    print_section("Agent Snapshot");
    print_kv("File", &args.agent.display().to_string());
    print_kv("Format version", &saved.version.to_string());
    print_kv("Extractor", saved.extractor_name());
    print_kv("Weights", &format_number(saved.weight_count()));
    if let Some(board_size) = saved.metadata.board_size {
        print_kv("Board", &format!("{board_size}x{board_size}"));
    }
    if let Some(trials) = saved.metadata.trials_trained {
        print_kv("Trials trained", &format_number(trials));
    }
    if let Some(seed) = saved.metadata.seed {
        print_kv("Seed", &seed.to_string());
    }
    if let Some(ref saved_at) = saved.metadata.saved_at {
        print_kv("Saved at", saved_at);
    }

    let agent = saved.to_agent()?;
    print_kv("Decisions taken", &format_number(agent.num_iters()));
    print_kv("Epsilon", &agent.exploration().to_string());
    print_kv("Action mode", &format!("{:?}", agent.action_mode()));

    let mut weights: Vec<(&crate::types::FeatureKey, &f64)> = agent.weights().iter().collect();
    weights.sort_by(|a, b| {
        b.1.abs()
            .partial_cmp(&a.1.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    print_subsection(&format!("Top {} features by |weight|", args.top));
    for (key, weight) in weights.into_iter().take(args.top) {
        println!("  {weight:>14.4}  {key}");
    }

    Ok(())
}

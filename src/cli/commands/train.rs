//! Train command - run Q-learning over simulated episodes

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    cli::output::{print_kv, print_section},
    mdp::{ActionMode, GameMdp},
    q_learning::{QLearningAgent, SavedAgent, TrainingMetadata},
    simulation::{JsonlObserver, ProgressObserver, SimulationConfig, SimulationResult, Simulator},
    types::reinforcement,
};

#[derive(Debug, Serialize)]
struct SummaryStats {
    trials: usize,
    wins: usize,
    win_rate: f64,
    mean_reward: f64,
    max_reward: f64,
}

impl From<&SimulationResult> for SummaryStats {
    fn from(result: &SimulationResult) -> Self {
        Self {
            trials: result.trials,
            wins: result.wins,
            win_rate: result.win_rate,
            mean_reward: result.mean_reward,
            max_reward: result.max_reward,
        }
    }
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    board_size: usize,
    max_iterations: usize,
    epsilon: f64,
    action_mode: String,
    extractor: String,
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: SummaryStats,
    metadata: SummaryMetadata,
}

pub(crate) fn parse_action_mode(value: &str) -> Result<ActionMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "full" => Ok(ActionMode::Full),
        "adjacent" | "adj" => Ok(ActionMode::Adjacent),
        other => Err(anyhow!(
            "Invalid action mode '{other}' (expected 'full' or 'adjacent')"
        )),
    }
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent")]
pub struct TrainArgs {
    /// Board edge length
    #[arg(long, short = 'b', default_value_t = reinforcement::DEFAULT_BOARD_SIZE)]
    pub board_size: usize,

    /// Number of training trials
    #[arg(long, short = 't', default_value_t = reinforcement::DEFAULT_TRIALS)]
    pub trials: usize,

    /// Cap on agent decisions per trial
    #[arg(long, default_value_t = reinforcement::DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Exploration rate for epsilon-greedy selection
    #[arg(long, short = 'e', default_value_t = reinforcement::DEFAULT_EXPLORATION)]
    pub epsilon: f64,

    /// Legal-action enumeration ('full' or 'adjacent')
    #[arg(long, default_value = "full")]
    pub action_mode: String,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file for the trained agent snapshot
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional file for JSONL trial observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show progress bar
    #[arg(long, default_value_t = true)]
    pub progress: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let action_mode = parse_action_mode(&args.action_mode)?;

    if args.board_size == 0 {
        return Err(anyhow!("Board size must be at least 1"));
    }
    if !(0.0..=1.0).contains(&args.epsilon) {
        return Err(anyhow!(
            "Epsilon must lie in [0, 1], got {}",
            args.epsilon
        ));
    }

    let summary_target = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    let config = SimulationConfig {
        num_trials: args.trials,
        max_iterations: args.max_iterations,
        seed: args.seed,
    };

    let mut mdp = GameMdp::new(args.board_size).with_action_mode(action_mode);
    let mut agent = QLearningAgent::new()
        .with_exploration(args.epsilon)
        .with_action_mode(action_mode);

    let mut simulator = Simulator::new(config);
    if args.progress {
        simulator = simulator.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(ref path) = args.observations {
        simulator = simulator.with_observer(Box::new(JsonlObserver::new(path)?));
    }

    print_section("Q-Learning Training");
    print_kv("Board", &format!("{0}x{0}", args.board_size));
    print_kv("Trials", &args.trials.to_string());
    print_kv("Max iterations", &args.max_iterations.to_string());
    print_kv("Epsilon", &args.epsilon.to_string());
    print_kv("Action mode", &format!("{action_mode:?}"));
    if let Some(seed) = args.seed {
        print_kv("Seed", &seed.to_string());
    }

    let result = simulator
        .run(&mut mdp, &mut agent)
        .map_err(|e| anyhow!("Simulation failed: {e}"))?;

    print_section("Training Complete");
    print_kv("Trials", &result.trials.to_string());
    print_kv(
        "Wins",
        &format!("{} ({:.1}%)", result.wins, result.win_rate * 100.0),
    );
    print_kv("Mean reward", &format!("{:.2}", result.mean_reward));
    print_kv("Max reward", &format!("{:.2}", result.max_reward));
    print_kv("Weights learned", &agent.weight_count().to_string());
    print_kv("Decisions taken", &agent.num_iters().to_string());

    if let Some(ref output) = args.output {
        let metadata = TrainingMetadata {
            board_size: Some(args.board_size),
            trials_trained: Some(result.trials),
            seed: args.seed,
            saved_at: None,
        };
        SavedAgent::from_agent(&agent, metadata).save_to_file(output)?;
        println!("\nAgent saved to: {}", output.display());
    }

    if let Some((path, normalized)) = summary_target {
        if normalized {
            println!("Normalizing summary path to: {}", path.display());
        }
        let summary = TrainingSummaryFile {
            training: SummaryStats::from(&result),
            metadata: SummaryMetadata {
                board_size: args.board_size,
                max_iterations: args.max_iterations,
                epsilon: args.epsilon,
                action_mode: format!("{action_mode:?}"),
                extractor: agent.extractor_name().to_string(),
                seed: args.seed,
            },
        };
        let file = std::fs::File::create(&path)?;
        to_writer_pretty(file, &summary)?;
        println!("Summary written to: {}", path.display());
    }

    Ok(())
}

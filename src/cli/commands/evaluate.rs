//! Evaluate command - re-run a trained agent greedily, learning disabled

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use serde::Serialize;

use crate::{
    cli::output::{print_kv, print_section},
    mdp::GameMdp,
    q_learning::SavedAgent,
    simulation::{
        FrozenLearner, ProgressObserver, RandomLearner, SimulationConfig, SimulationResult,
        Simulator,
    },
    types::reinforcement,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained agent")]
pub struct EvaluateArgs {
    /// Path to a trained agent snapshot
    pub agent: PathBuf,

    /// Number of evaluation trials
    #[arg(long, short = 't', default_value_t = 100)]
    pub trials: usize,

    /// Cap on agent decisions per trial
    #[arg(long, default_value_t = reinforcement::DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Board edge length (defaults to the snapshot's training board)
    #[arg(long, short = 'b')]
    pub board_size: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Also run a uniform-random baseline under the same configuration
    #[arg(long)]
    pub baseline: bool,

    /// Export results to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Show progress bar
    #[arg(long, default_value_t = true)]
    pub progress: bool,
}

#[derive(Debug, Serialize)]
struct EvaluationStats {
    trials: usize,
    wins: usize,
    win_rate: f64,
    mean_reward: f64,
    max_reward: f64,
}

impl From<&SimulationResult> for EvaluationStats {
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
struct EvaluationExport {
    agent: EvaluationStats,
    baseline: Option<EvaluationStats>,
    board_size: usize,
    seed: Option<u64>,
}

fn print_result(result: &SimulationResult) {
    print_kv("Trials", &result.trials.to_string());
    print_kv(
        "Wins",
        &format!("{} ({:.1}%)", result.wins, result.win_rate * 100.0),
    );
    print_kv("Mean reward", &format!("{:.2}", result.mean_reward));
    print_kv("Max reward", &format!("{:.2}", result.max_reward));
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    println!("Loading trained agent from: {}", args.agent.display());
    let saved = SavedAgent::load_from_file(&args.agent)?;

    print_section("Loaded Agent");
    print_kv("Extractor", saved.extractor_name());
    print_kv("Weights", &saved.weight_count().to_string());
    if let Some(board_size) = saved.metadata.board_size {
        print_kv("Trained on", &format!("{board_size}x{board_size}"));
    }
    if let Some(trials) = saved.metadata.trials_trained {
        print_kv("Trials trained", &trials.to_string());
    }
    if let Some(seed) = saved.metadata.seed {
        print_kv("Training seed", &seed.to_string());
    }

    let board_size = args
        .board_size
        .or(saved.metadata.board_size)
        .unwrap_or(reinforcement::DEFAULT_BOARD_SIZE);
    if board_size == 0 {
        return Err(anyhow!("Board size must be at least 1"));
    }

    let mut agent = saved.to_agent()?;
    // Evaluation is greedy: no exploration, no learning.
    agent.set_exploration(0.0);

    let config = SimulationConfig {
        num_trials: args.trials,
        max_iterations: args.max_iterations,
        seed: args.seed,
    };

    let mut mdp = GameMdp::new(board_size).with_action_mode(agent.action_mode());
    let mut frozen = FrozenLearner::new(&mut agent);

    let mut simulator = Simulator::new(config.clone());
    if args.progress {
        simulator = simulator.with_observer(Box::new(ProgressObserver::new()));
    }
    let agent_result = simulator
        .run(&mut mdp, &mut frozen)
        .map_err(|e| anyhow!("Evaluation failed: {e}"))?;

    print_section("Evaluation Result");
    print_result(&agent_result);

    let baseline_result = if args.baseline {
        let mut baseline_mdp = GameMdp::new(board_size);
        let mut baseline = RandomLearner::new("Random".to_string());
        let mut simulator = Simulator::new(config);
        if args.progress {
            simulator = simulator.with_observer(Box::new(ProgressObserver::new()));
        }
        let result = simulator
            .run(&mut baseline_mdp, &mut baseline)
            .map_err(|e| anyhow!("Baseline run failed: {e}"))?;

        print_section("Random Baseline");
        print_result(&result);
        println!(
            "\nAgent win rate {:.1}% vs baseline {:.1}%",
            agent_result.win_rate * 100.0,
            result.win_rate * 100.0
        );
        Some(result)
    } else {
        None
    };

    if let Some(ref export) = args.export {
        let payload = EvaluationExport {
            agent: EvaluationStats::from(&agent_result),
            baseline: baseline_result.as_ref().map(EvaluationStats::from),
            board_size,
            seed: args.seed,
        };
        let file = std::fs::File::create(export)?;
        serde_json::to_writer_pretty(file, &payload)?;
        println!("Results exported to: {}", export.display());
    }

    Ok(())
}

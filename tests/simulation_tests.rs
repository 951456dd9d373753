//! Integration tests for the episode simulator

use std::sync::{Arc, Mutex};

use gomoku_rl::{
    BoardState, GameMdp, Learner, Observer, Position, QLearningAgent, Result, SimulationConfig,
    Simulator,
    simulation::{FrozenLearner, JsonlObserver, MetricsObserver, RandomLearner},
};

fn config(num_trials: usize, seed: u64) -> SimulationConfig {
    SimulationConfig {
        num_trials,
        max_iterations: 200,
        seed: Some(seed),
    }
}

#[test]
fn test_seeded_training_runs_are_identical() {
    let run = || {
        let mut mdp = GameMdp::new(6);
        let mut agent = QLearningAgent::new();
        Simulator::new(config(10, 42))
            .run(&mut mdp, &mut agent)
            .unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first.rewards, second.rewards);
    assert_eq!(first.wins, second.wins);
}

#[test]
fn test_different_seeds_diverge() {
    let run = |seed| {
        let mut mdp = GameMdp::new(6);
        let mut agent = QLearningAgent::new();
        Simulator::new(config(20, seed))
            .run(&mut mdp, &mut agent)
            .unwrap()
    };

    // Twenty 6x6 games under two different seeds producing identical
    // reward traces would mean the seeds are being ignored.
    assert_ne!(run(1).rewards, run(2).rewards);
}

#[test]
fn test_training_accumulates_weights_across_trials() {
    let mut mdp = GameMdp::new(6);
    let mut agent = QLearningAgent::new();
    Simulator::new(config(10, 7))
        .run(&mut mdp, &mut agent)
        .unwrap();

    assert!(agent.weight_count() > 0, "training must grow the weight map");
    assert!(agent.num_iters() > 0);
}

#[test]
fn test_rewards_are_zero_or_discounted_win_reward() {
    let mut mdp = GameMdp::new(6);
    let mut agent = QLearningAgent::new();
    let result = Simulator::new(config(30, 11))
        .run(&mut mdp, &mut agent)
        .unwrap();

    // The only nonzero reward in this MDP is the win reward, delivered
    // once per episode, so every trial total is 0 or 5000 * 0.9^k.
    for &reward in &result.rewards {
        assert!(reward >= 0.0);
        if reward > 0.0 {
            let mut remaining = reward / 5000.0;
            while remaining < 0.999 {
                remaining /= 0.9;
            }
            assert!((remaining - 1.0).abs() < 1e-9, "unexpected reward {reward}");
        }
    }
    assert_eq!(
        result.wins,
        result.rewards.iter().filter(|&&r| r > 0.0).count()
    );
}

/// Learner that never has an action; every trial must end immediately.
struct NullLearner;

impl Learner for NullLearner {
    fn select_action(&mut self, _state: &BoardState) -> Option<Position> {
        None
    }

    fn name(&self) -> &str {
        "Null"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[test]
fn test_trial_without_transitions_scores_exactly_zero() {
    let mut mdp = GameMdp::new(6);
    let mut learner = NullLearner;
    let result = Simulator::new(config(5, 3))
        .run(&mut mdp, &mut learner)
        .unwrap();

    assert_eq!(result.rewards, vec![0.0; 5]);
    assert_eq!(result.wins, 0);
    assert_eq!(result.win_rate, 0.0);
}

#[test]
fn test_frozen_agent_does_not_learn_during_evaluation() {
    let mut mdp = GameMdp::new(6);
    let mut agent = QLearningAgent::new();
    Simulator::new(config(5, 13))
        .run(&mut mdp, &mut agent)
        .unwrap();

    agent.set_exploration(0.0);
    let weights_before = agent.weights().clone();
    let iters_before = agent.num_iters();

    let mut eval_mdp = GameMdp::new(6);
    let mut frozen = FrozenLearner::new(&mut agent);
    Simulator::new(config(5, 17))
        .run(&mut eval_mdp, &mut frozen)
        .unwrap();

    assert_eq!(agent.weights(), &weights_before);
    // Selection still advances the counter; only feedback is dropped.
    assert!(agent.num_iters() > iters_before);
}

#[derive(Default)]
struct EventLog {
    run_starts: usize,
    trial_starts: usize,
    trial_ends: usize,
    steps: usize,
    run_ends: usize,
}

struct RecordingObserver {
    log: Arc<Mutex<EventLog>>,
}

impl Observer for RecordingObserver {
    fn on_run_start(&mut self, _num_trials: usize) -> Result<()> {
        self.log.lock().unwrap().run_starts += 1;
        Ok(())
    }

    fn on_trial_start(&mut self, _trial: usize) -> Result<()> {
        self.log.lock().unwrap().trial_starts += 1;
        Ok(())
    }

    fn on_step(
        &mut self,
        _trial: usize,
        _step: usize,
        _state: &BoardState,
        _action: Position,
        _reward: f64,
    ) -> Result<()> {
        self.log.lock().unwrap().steps += 1;
        Ok(())
    }

    fn on_trial_end(&mut self, _trial: usize, _discounted_reward: f64) -> Result<()> {
        self.log.lock().unwrap().trial_ends += 1;
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        self.log.lock().unwrap().run_ends += 1;
        Ok(())
    }
}

#[test]
fn test_observer_event_sequence() {
    let log = Arc::new(Mutex::new(EventLog::default()));
    let mut mdp = GameMdp::new(6);
    let mut learner = RandomLearner::new("Random".to_string());

    Simulator::new(config(4, 23))
        .with_observer(Box::new(RecordingObserver {
            log: Arc::clone(&log),
        }))
        .run(&mut mdp, &mut learner)
        .unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.run_starts, 1);
    assert_eq!(log.trial_starts, 4);
    assert_eq!(log.trial_ends, 4);
    assert_eq!(log.run_ends, 1);
    assert!(log.steps >= 4, "each trial takes at least one step");
}

#[test]
fn test_metrics_observer_summary() {
    let mut metrics = MetricsObserver::new();
    let board = BoardState::new(6);

    metrics.on_run_start(2).unwrap();
    metrics.on_trial_start(0).unwrap();
    metrics.on_step(0, 0, &board, Position::new(0, 0), 0.0).unwrap();
    metrics.on_step(0, 1, &board, Position::new(0, 1), 5000.0).unwrap();
    metrics.on_trial_end(0, 4500.0).unwrap();
    metrics.on_trial_start(1).unwrap();
    metrics.on_step(1, 0, &board, Position::new(2, 2), 0.0).unwrap();
    metrics.on_trial_end(1, 0.0).unwrap();
    metrics.on_run_end().unwrap();

    let summary = metrics.summary();
    assert_eq!(summary.trials, 2);
    assert_eq!(summary.wins, 1);
    assert_eq!(summary.win_rate, 0.5);
    assert_eq!(summary.mean_reward, 2250.0);
    assert_eq!(summary.avg_trial_length, 1.5);
}

#[test]
fn test_jsonl_observer_writes_one_line_per_trial() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let path = file.path().to_path_buf();

    let mut mdp = GameMdp::new(6);
    let mut learner = RandomLearner::new("Random".to_string());
    Simulator::new(config(3, 29))
        .with_observer(Box::new(JsonlObserver::new(&path).unwrap()))
        .run(&mut mdp, &mut learner)
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);

    for (trial, line) in lines.iter().enumerate() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["trial"], trial);
        assert!(value["total_steps"].as_u64().unwrap() >= 1);
        assert!(value["steps"].as_array().unwrap().len() >= 1);
        assert!(value["discounted_reward"].is_number());
    }
}

#[test]
fn test_random_learner_baseline_finishes_every_trial() {
    let mut mdp = GameMdp::new(6);
    let mut learner = RandomLearner::with_seed("Random".to_string(), 99);
    let result = Simulator::new(config(15, 31))
        .run(&mut mdp, &mut learner)
        .unwrap();

    assert_eq!(result.trials, 15);
    assert_eq!(result.rewards.len(), 15);
}

//! The episode loop

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    mdp::GameMdp,
    ports::{Learner, Observer},
    types::reinforcement,
    utils::{build_rng, cumulative_sample, mean},
};

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of independent trials
    pub num_trials: usize,

    /// Cap on agent decisions per trial
    pub max_iterations: usize,

    /// Random seed; derived seeds go to the learner, the MDP's opponent
    /// RNG, and the transition sampler
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_trials: reinforcement::DEFAULT_TRIALS,
            max_iterations: reinforcement::DEFAULT_MAX_ITERATIONS,
            seed: None,
        }
    }
}

/// Result of a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Total discounted reward per trial
    pub rewards: Vec<f64>,

    /// Total trials run
    pub trials: usize,

    /// Trials with positive discounted reward (the agent won)
    pub wins: usize,

    /// Win rate
    pub win_rate: f64,

    /// Mean discounted reward
    pub mean_reward: f64,

    /// Maximum discounted reward
    pub max_reward: f64,
}

impl SimulationResult {
    pub fn new(rewards: Vec<f64>) -> Self {
        let trials = rewards.len();
        let wins = rewards.iter().filter(|&&r| r > 0.0).count();
        let win_rate = if trials > 0 {
            wins as f64 / trials as f64
        } else {
            0.0
        };
        let mean_reward = mean(&rewards);
        let max_reward = rewards.iter().copied().fold(0.0, f64::max);

        Self {
            rewards,
            trials,
            wins,
            win_rate,
            mean_reward,
            max_reward,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Runs episodes of one learner against one MDP.
pub struct Simulator {
    config: SimulationConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the run.
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run `num_trials` episodes.
    ///
    /// Per decision: ask the learner for an action, query the MDP for
    /// transitions, sample one by cumulative probability, deliver feedback,
    /// accumulate `total_discount * reward`, multiply the discount, and
    /// advance. An empty transition set (or no action) ends the trial with
    /// one final zero-reward feedback and `next_state = None`.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::Error::InvalidDistribution`] from the sampler
    /// and any observer failure. Both are fatal to the run.
    pub fn run(&mut self, mdp: &mut GameMdp, learner: &mut dyn Learner) -> Result<SimulationResult> {
        if let Some(seed) = self.config.seed {
            learner.set_rng_seed(seed);
            mdp.set_rng_seed(seed.wrapping_add(1));
        }
        let mut sampler_rng = build_rng(self.config.seed.map(|s| s.wrapping_add(2)));

        for observer in &mut self.observers {
            observer.on_run_start(self.config.num_trials)?;
        }

        let mut rewards = Vec::with_capacity(self.config.num_trials);
        for trial in 0..self.config.num_trials {
            for observer in &mut self.observers {
                observer.on_trial_start(trial)?;
            }

            let mut state = mdp.start_state();
            let mut total_discount = 1.0;
            let mut total_reward = 0.0;

            for step in 0..self.config.max_iterations {
                let Some(action) = learner.select_action(&state) else {
                    break;
                };
                let mut transitions = mdp.succ_and_prob_reward(&state, action)?;
                if transitions.is_empty() {
                    learner.incorporate_feedback(&state, action, 0.0, None);
                    break;
                }

                let probabilities: Vec<f64> =
                    transitions.iter().map(|t| t.probability).collect();
                let index = cumulative_sample(&mut sampler_rng, &probabilities)?;
                let transition = transitions.swap_remove(index);

                for observer in &mut self.observers {
                    observer.on_step(trial, step, &state, action, transition.reward)?;
                }

                learner.incorporate_feedback(
                    &state,
                    action,
                    transition.reward,
                    transition.successor.as_ref(),
                );

                total_reward += total_discount * transition.reward;
                total_discount *= mdp.discount();

                match transition.successor {
                    Some(successor) => state = successor,
                    None => break,
                }
            }

            for observer in &mut self.observers {
                observer.on_trial_end(trial, total_reward)?;
            }
            rewards.push(total_reward);
        }

        for observer in &mut self.observers {
            observer.on_run_end()?;
        }

        Ok(SimulationResult::new(rewards))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{q_learning::QLearningAgent, simulation::RandomLearner};

    #[test]
    fn test_run_produces_one_reward_per_trial() {
        let config = SimulationConfig {
            num_trials: 5,
            max_iterations: 50,
            seed: Some(42),
        };
        let mut mdp = GameMdp::new(6);
        let mut learner = RandomLearner::new("Random".to_string());

        let result = Simulator::new(config).run(&mut mdp, &mut learner).unwrap();
        assert_eq!(result.rewards.len(), 5);
        assert_eq!(result.trials, 5);
        assert_eq!(result.wins + result.rewards.iter().filter(|&&r| r <= 0.0).count(), 5);
    }

    #[test]
    fn test_seeded_runs_are_deterministic() {
        let config = SimulationConfig {
            num_trials: 8,
            max_iterations: 100,
            seed: Some(7),
        };

        let mut first_mdp = GameMdp::new(6);
        let mut first_agent = QLearningAgent::new();
        let first = Simulator::new(config.clone())
            .run(&mut first_mdp, &mut first_agent)
            .unwrap();

        let mut second_mdp = GameMdp::new(6);
        let mut second_agent = QLearningAgent::new();
        let second = Simulator::new(config)
            .run(&mut second_mdp, &mut second_agent)
            .unwrap();

        assert_eq!(first.rewards, second.rewards);
    }

    #[test]
    fn test_result_statistics() {
        let result = SimulationResult::new(vec![0.0, 4050.0, 0.0, 4500.0]);
        assert_eq!(result.trials, 4);
        assert_eq!(result.wins, 2);
        assert_eq!(result.win_rate, 0.5);
        assert_eq!(result.max_reward, 4500.0);
        assert_eq!(result.mean_reward, 2137.5);
    }

    #[test]
    fn test_empty_result_statistics() {
        let result = SimulationResult::new(Vec::new());
        assert_eq!(result.trials, 0);
        assert_eq!(result.win_rate, 0.0);
        assert_eq!(result.mean_reward, 0.0);
    }
}

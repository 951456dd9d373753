//! Observer adapters for simulation runs

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{Result, gomoku::BoardState, ports::Observer, types::Position};

/// Observation of a single decision within a trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    /// Step number within the trial
    pub step: usize,
    /// Board state before the action, text-encoded
    pub state: String,
    /// Action taken, board notation
    pub action: String,
    /// Reward delivered for this step
    pub reward: f64,
}

/// Complete observation of one trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialObservation {
    /// Trial number
    pub trial: usize,
    /// Steps in the trial
    pub steps: Vec<StepObservation>,
    /// Number of agent decisions
    pub total_steps: usize,
    /// Total discounted reward
    pub discounted_reward: f64,
}

/// Progress bar observer - shows simulation progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    trials: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            trials: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self, num_trials: usize) -> Result<()> {
        let pb = ProgressBar::new(num_trials as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} trials ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_trial_end(&mut self, trial: usize, discounted_reward: f64) -> Result<()> {
        self.trials += 1;
        if discounted_reward > 0.0 {
            self.wins += 1;
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position((trial + 1) as u64);
            pb.set_message(format!("W:{}/{}", self.wins, self.trials));
        }
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("W:{}/{}", self.wins, self.trials));
        }
        Ok(())
    }
}

/// Metrics observer - tracks running totals
pub struct MetricsObserver {
    wins: usize,
    trials: usize,
    total_reward: f64,
    step_counts: Vec<usize>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self {
            wins: 0,
            trials: 0,
            total_reward: 0.0,
            step_counts: Vec::new(),
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.wins as f64 / self.trials as f64
        }
    }

    pub fn mean_reward(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.total_reward / self.trials as f64
        }
    }

    /// Mean number of agent decisions per trial
    pub fn avg_trial_length(&self) -> f64 {
        if self.step_counts.is_empty() {
            0.0
        } else {
            self.step_counts.iter().sum::<usize>() as f64 / self.step_counts.len() as f64
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            trials: self.trials,
            wins: self.wins,
            win_rate: self.win_rate(),
            mean_reward: self.mean_reward(),
            avg_trial_length: self.avg_trial_length(),
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of simulation metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub trials: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub mean_reward: f64,
    pub avg_trial_length: f64,
}

impl Observer for MetricsObserver {
    fn on_trial_start(&mut self, _trial: usize) -> Result<()> {
        self.step_counts.push(0);
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
        if let Some(last) = self.step_counts.last_mut() {
            *last += 1;
        }
        Ok(())
    }

    fn on_trial_end(&mut self, _trial: usize, discounted_reward: f64) -> Result<()> {
        self.trials += 1;
        self.total_reward += discounted_reward;
        if discounted_reward > 0.0 {
            self.wins += 1;
        }
        Ok(())
    }
}

/// JSONL observer - exports one JSON object per trial
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_steps: Vec<StepObservation>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            current_steps: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_trial_start(&mut self, _trial: usize) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(
        &mut self,
        _trial: usize,
        step: usize,
        state: &BoardState,
        action: Position,
        reward: f64,
    ) -> Result<()> {
        self.current_steps.push(StepObservation {
            step,
            state: state.encode(),
            action: action.to_string(),
            reward,
        });
        Ok(())
    }

    fn on_trial_end(&mut self, trial: usize, discounted_reward: f64) -> Result<()> {
        let observation = TrialObservation {
            trial,
            total_steps: self.current_steps.len(),
            steps: std::mem::take(&mut self.current_steps),
            discounted_reward,
        };

        // One JSON object per line.
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;

        Ok(())
    }
}

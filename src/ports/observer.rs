//! Observer port - abstraction for simulation observation
//!
//! Observers allow composable data collection during simulation runs
//! without coupling the episode loop to specific output formats.

use crate::{Result, gomoku::BoardState, types::Position};

/// Observer trait for monitoring simulation runs.
///
/// # Event sequence
///
/// 1. `on_run_start(num_trials)` - once at the beginning
/// 2. For each trial:
///    - `on_trial_start(trial)`
///    - `on_step(...)` - for each sampled transition
///    - `on_trial_end(trial, discounted_reward)`
/// 3. `on_run_end()` - once at the end
///
/// All hooks default to no-ops, so implementations override only what they
/// need.
pub trait Observer: Send {
    /// Called once before the first trial.
    fn on_run_start(&mut self, _num_trials: usize) -> Result<()> {
        Ok(())
    }

    /// Called when a trial starts.
    fn on_trial_start(&mut self, _trial: usize) -> Result<()> {
        Ok(())
    }

    /// Called for each sampled transition, after the agent's action but
    /// before the feedback is delivered. `state` is the pre-action state.
    fn on_step(
        &mut self,
        _trial: usize,
        _step: usize,
        _state: &BoardState,
        _action: Position,
        _reward: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when a trial ends with its total discounted reward.
    fn on_trial_end(&mut self, _trial: usize, _discounted_reward: f64) -> Result<()> {
        Ok(())
    }

    /// Called once after the last trial.
    fn on_run_end(&mut self) -> Result<()> {
        Ok(())
    }
}

//! Learner port - abstraction over action sources
//!
//! The simulator drives any action source through this interface: the
//! Q-learning agent, random baselines, frozen evaluation wrappers, or an
//! external human-input collaborator. All of them exchange `(row, col)`
//! board coordinates and nothing else.

use crate::{gomoku::BoardState, types::Position};

/// Unified interface for anything that picks moves and (optionally) learns.
///
/// # Event sequence
///
/// Within one episode the simulator calls `select_action` once per
/// decision, then `incorporate_feedback` with the sampled transition's
/// reward and successor. A `None` successor marks the terminal feedback
/// that ends the episode.
pub trait Learner: Send {
    /// Select an action for the given board state.
    ///
    /// Returns `None` when no legal action exists. An empty action set is
    /// an ordinary terminal/draw condition, not an error.
    fn select_action(&mut self, state: &BoardState) -> Option<Position>;

    /// Deliver one step of experience.
    ///
    /// `next_state` is `None` for terminal transitions. Non-adaptive
    /// learners use the default no-op.
    fn incorporate_feedback(
        &mut self,
        _state: &BoardState,
        _action: Position,
        _reward: f64,
        _next_state: Option<&BoardState>,
    ) {
    }

    /// The learner's name, used for reporting.
    fn name(&self) -> &str;

    /// Reset learned state to initial conditions.
    ///
    /// Stateless learners use the default no-op.
    fn reset(&mut self) {}

    /// Enable downcasting to concrete learner types.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Seed the learner's internal RNG for reproducible runs.
    ///
    /// Stateless learners can ignore this.
    fn set_rng_seed(&mut self, _seed: u64) {}
}

//! Baseline and wrapper learners

use rand::{prelude::IndexedRandom, rngs::StdRng};

use crate::{gomoku::BoardState, ports::Learner, types::Position, utils::build_rng};

/// Uniform-random baseline over the full legal-move enumeration.
pub struct RandomLearner {
    name: String,
    rng: StdRng,
}

impl RandomLearner {
    pub fn new(name: String) -> Self {
        Self {
            name,
            rng: build_rng(None),
        }
    }

    pub fn with_seed(name: String, seed: u64) -> Self {
        Self {
            name,
            rng: build_rng(Some(seed)),
        }
    }
}

impl Learner for RandomLearner {
    fn select_action(&mut self, state: &BoardState) -> Option<Position> {
        state.legal_moves().choose(&mut self.rng).copied()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = build_rng(Some(seed));
    }
}

/// Wrapper that forwards action selection but drops all feedback.
///
/// Evaluation runs wrap the trained agent in this so the measured policy
/// is the one that existed after training, not one that keeps evolving
/// during evaluation.
pub struct FrozenLearner<'a> {
    inner: &'a mut dyn Learner,
}

impl<'a> FrozenLearner<'a> {
    pub fn new(inner: &'a mut dyn Learner) -> Self {
        Self { inner }
    }
}

impl Learner for FrozenLearner<'_> {
    fn select_action(&mut self, state: &BoardState) -> Option<Position> {
        self.inner.select_action(state)
    }

    fn incorporate_feedback(
        &mut self,
        _state: &BoardState,
        _action: Position,
        _reward: f64,
        _next_state: Option<&BoardState>,
    ) {
        // Learning is frozen during evaluation.
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self.inner.as_any()
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.inner.set_rng_seed(seed);
    }
}

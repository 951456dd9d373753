//! Q-learning agent with sparse linear value approximation

use std::collections::HashMap;

use rand::{Rng, prelude::IndexedRandom, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    features::{FeatureExtractor, MeanDistanceExtractor},
    gomoku::BoardState,
    mdp::ActionMode,
    ports::Learner,
    types::{FeatureKey, Position, reinforcement},
    utils::build_rng,
};

/// Serializable agent state, persisted inside [`super::SavedAgent`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AgentState {
    pub weights: HashMap<FeatureKey, f64>,
    pub num_iters: usize,
    pub discount: f64,
    pub exploration: f64,
    pub action_mode: ActionMode,
    pub extractor: String,
    pub rng_seed: Option<u64>,
}

/// Online Q-learning agent (off-policy TD control, linear approximation).
///
/// Action values are `Q(s, a) = W · φ(s, a)` with a sparse weight map `W`
/// defaulting to 0 for unseen feature keys. Selection is ε-greedy; each
/// observed transition applies the semi-gradient update
/// `W[f] -= η · (Q(s, a) - (r + γ·V(s'))) · φ_f(s, a)` with step size
/// `η = 1/√n` over the selection counter `n`.
///
/// The weight map persists across episodes (that is the point of learning)
/// and is cleared only by [`Learner::reset`].
pub struct QLearningAgent {
    weights: HashMap<FeatureKey, f64>,
    num_iters: usize,
    discount: f64,
    exploration: f64,
    action_mode: ActionMode,
    extractor: Box<dyn FeatureExtractor>,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl std::fmt::Debug for QLearningAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QLearningAgent")
            .field("weights", &self.weights)
            .field("num_iters", &self.num_iters)
            .field("discount", &self.discount)
            .field("exploration", &self.exploration)
            .field("action_mode", &self.action_mode)
            .field("extractor", &self.extractor.name())
            .field("rng_seed", &self.rng_seed)
            .finish()
    }
}

impl QLearningAgent {
    /// Create an agent with the shipped defaults: discount 0.9, ε 0.2,
    /// full action enumeration, mean-distance features.
    pub fn new() -> Self {
        Self::with_extractor(Box::new(MeanDistanceExtractor::new()))
    }

    /// Create an agent with a custom feature extractor.
    pub fn with_extractor(extractor: Box<dyn FeatureExtractor>) -> Self {
        Self {
            weights: HashMap::new(),
            num_iters: 0,
            discount: reinforcement::DISCOUNT,
            exploration: reinforcement::DEFAULT_EXPLORATION,
            action_mode: ActionMode::default(),
            extractor,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = build_rng(Some(seed));
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_action_mode(mut self, mode: ActionMode) -> Self {
        self.action_mode = mode;
        self
    }

    /// Set the exploration rate in place (evaluation runs force it to 0).
    pub fn set_exploration(&mut self, exploration: f64) {
        self.exploration = exploration;
    }

    pub fn exploration(&self) -> f64 {
        self.exploration
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn action_mode(&self) -> ActionMode {
        self.action_mode
    }

    /// Number of `select_action` calls so far.
    pub fn num_iters(&self) -> usize {
        self.num_iters
    }

    /// Number of distinct feature keys with a stored weight.
    pub fn weight_count(&self) -> usize {
        self.weights.len()
    }

    /// The learned weights, for inspection.
    pub fn weights(&self) -> &HashMap<FeatureKey, f64> {
        &self.weights
    }

    pub fn extractor_name(&self) -> &str {
        self.extractor.name()
    }

    /// Collapse the extractor's output into a map (duplicate feature keys
    /// resolve last-write-wins).
    fn feature_vector(&self, state: &BoardState, action: Position) -> HashMap<FeatureKey, f64> {
        self.extractor.extract(state, action).into_iter().collect()
    }

    /// Estimated action value: dot product of features with the weights.
    ///
    /// Pure with respect to the weights; identical inputs yield identical
    /// outputs until the next update.
    pub fn get_q(&self, state: &BoardState, action: Position) -> f64 {
        self.feature_vector(state, action)
            .iter()
            .map(|(key, value)| self.weights.get(key).copied().unwrap_or(0.0) * value)
            .sum()
    }

    /// Current step size `1/√n`.
    ///
    /// Strictly decreasing in the selection counter. Callers must have
    /// invoked [`Learner::select_action`] at least once; before that the
    /// counter is 0 and the step size is infinite.
    pub fn step_size(&self) -> f64 {
        1.0 / (self.num_iters as f64).sqrt()
    }

    /// Greedy action: maximal `get_q`, ties broken by enumeration order.
    fn best_action(&self, actions: &[Position], state: &BoardState) -> Option<Position> {
        let mut best: Option<(Position, f64)> = None;
        for &action in actions {
            let q = self.get_q(state, action);
            match best {
                Some((_, best_q)) if q <= best_q => {}
                _ => best = Some((action, q)),
            }
        }
        best.map(|(action, _)| action)
    }

    pub(crate) fn export_state(&self) -> AgentState {
        AgentState {
            weights: self.weights.clone(),
            num_iters: self.num_iters,
            discount: self.discount,
            exploration: self.exploration,
            action_mode: self.action_mode,
            extractor: self.extractor.name().to_string(),
            rng_seed: self.rng_seed,
        }
    }

    pub(crate) fn from_state(state: AgentState, extractor: Box<dyn FeatureExtractor>) -> Self {
        Self {
            weights: state.weights,
            num_iters: state.num_iters,
            discount: state.discount,
            exploration: state.exploration,
            action_mode: state.action_mode,
            extractor,
            rng: build_rng(state.rng_seed),
            rng_seed: state.rng_seed,
        }
    }
}

impl Default for QLearningAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Learner for QLearningAgent {
    /// ε-greedy selection over the enumerated legal actions.
    ///
    /// Increments the selection counter on every call, exploring or
    /// exploiting alike, then returns `None` when no legal action exists.
    fn select_action(&mut self, state: &BoardState) -> Option<Position> {
        self.num_iters += 1;

        let actions = self.action_mode.actions(state);
        if actions.is_empty() {
            return None;
        }

        if self.rng.random::<f64>() < self.exploration {
            actions.choose(&mut self.rng).copied()
        } else {
            self.best_action(&actions, state)
        }
    }

    /// Semi-gradient Q-learning update.
    ///
    /// `V(s')` is 0 for terminal feedback, otherwise the maximum `get_q`
    /// over the successor's legal actions. Weights for features absent
    /// from this step are untouched.
    fn incorporate_feedback(
        &mut self,
        state: &BoardState,
        action: Position,
        reward: f64,
        next_state: Option<&BoardState>,
    ) {
        let v_opt = match next_state {
            Some(next) => self
                .action_mode
                .actions(next)
                .into_iter()
                .map(|a| self.get_q(next, a))
                .fold(None::<f64>, |max, q| Some(max.map_or(q, |m| m.max(q))))
                .unwrap_or(0.0),
            None => 0.0,
        };

        let q_opt = self.get_q(state, action);
        let step_size = self.step_size();
        let td_error = q_opt - (reward + self.discount * v_opt);

        for (key, value) in self.feature_vector(state, action) {
            *self.weights.entry(key).or_insert(0.0) -= step_size * td_error * value;
        }
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn reset(&mut self) {
        self.weights.clear();
        self.num_iters = 0;
        self.rng = build_rng(self.rng_seed);
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = build_rng(Some(seed));
        self.rng_seed = Some(seed);
    }
}

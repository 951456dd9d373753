//! Markov Decision Process formalization of the game
//!
//! The two-player game is folded into a single-agent MDP: the environment's
//! transition function places the agent's stone *and* simulates one
//! uniformly random opponent reply before handing the successor state back.
//! From the learner's point of view each decision therefore faces a
//! stochastic but Markovian environment.

use rand::{prelude::IndexedRandom, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    gomoku::{BoardState, Cell},
    types::{Position, reinforcement},
    utils::build_rng,
};

/// One outcome of a transition call.
///
/// A `successor` of `None` marks a terminal transition: the episode ends and
/// no further decisions follow. Probabilities across the transitions
/// returned by one call sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub successor: Option<BoardState>,
    pub probability: f64,
    pub reward: f64,
}

impl Transition {
    fn terminal(reward: f64) -> Self {
        Transition {
            successor: None,
            probability: 1.0,
            reward,
        }
    }
}

/// Legal-action enumeration strategy.
///
/// `Full` enumerates every empty cell. `Adjacent` restricts to empty cells
/// within Chebyshev distance 1 of an existing stone, falling back to the
/// full enumeration on an empty board. Both enumerate in row-major order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionMode {
    #[default]
    Full,
    Adjacent,
}

impl ActionMode {
    /// Enumerate legal actions for a non-terminal state.
    pub fn actions(self, state: &BoardState) -> Vec<Position> {
        match self {
            ActionMode::Full => state.legal_moves(),
            ActionMode::Adjacent => {
                let adjacent: Vec<Position> = state
                    .legal_moves()
                    .into_iter()
                    .filter(|&pos| has_adjacent_stone(state, pos))
                    .collect();
                if adjacent.is_empty() {
                    state.legal_moves()
                } else {
                    adjacent
                }
            }
        }
    }
}

fn has_adjacent_stone(state: &BoardState, pos: Position) -> bool {
    for d_row in -1..=1isize {
        for d_col in -1..=1isize {
            if d_row == 0 && d_col == 0 {
                continue;
            }
            let occupied = pos.offset(d_row, d_col).is_some_and(|neighbor| {
                state.cell(neighbor).is_some_and(|cell| cell != Cell::Empty)
            });
            if occupied {
                return true;
            }
        }
    }
    false
}

/// The game environment as an MDP.
///
/// Owns the RNG that draws the folded-in opponent reply, so a seeded MDP
/// replays the same opponent move sequence.
#[derive(Debug)]
pub struct GameMdp {
    board_size: usize,
    action_mode: ActionMode,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl GameMdp {
    /// Create an MDP over an N×N board with an unseeded opponent RNG.
    pub fn new(board_size: usize) -> Self {
        GameMdp {
            board_size,
            action_mode: ActionMode::default(),
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    pub fn with_action_mode(mut self, mode: ActionMode) -> Self {
        self.action_mode = mode;
        self
    }

    pub fn board_size(&self) -> usize {
        self.board_size
    }

    pub fn action_mode(&self) -> ActionMode {
        self.action_mode
    }

    /// Reseed the opponent-reply RNG.
    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = build_rng(Some(seed));
        self.rng_seed = Some(seed);
    }

    /// A fresh all-empty board.
    pub fn start_state(&self) -> BoardState {
        BoardState::new(self.board_size)
    }

    /// Legal actions for `state`; empty when the state is terminal.
    pub fn actions(&self, state: &BoardState) -> Vec<Position> {
        if state.winner().is_some() {
            return Vec::new();
        }
        self.action_mode.actions(state)
    }

    /// Discount factor, applied once per agent decision (not per ply).
    pub fn discount(&self) -> f64 {
        reinforcement::DISCOUNT
    }

    /// Apply `action` for the side to move, then simulate one uniformly
    /// random opponent reply.
    ///
    /// Returns a single transition:
    /// - the agent's stone completes five in a row: terminal, reward
    ///   [`reinforcement::WIN_REWARD`];
    /// - the opponent's reply completes five in a row: terminal, reward 0
    ///   (losing is deliberately not punished);
    /// - no legal reply exists after either placement: terminal, reward 0;
    /// - otherwise: the post-reply board as successor, probability 1,
    ///   reward 0.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidMove`] when `action` targets an
    /// occupied cell; never for actions drawn from [`Self::actions`].
    pub fn succ_and_prob_reward(
        &mut self,
        state: &BoardState,
        action: Position,
    ) -> Result<Vec<Transition>> {
        let agent = state.player_to_move();
        let after_agent = state.place(action, agent)?;

        if after_agent.has_five(agent) {
            return Ok(vec![Transition::terminal(reinforcement::WIN_REWARD)]);
        }

        let replies = self.action_mode.actions(&after_agent);
        let Some(&reply) = replies.choose(&mut self.rng) else {
            return Ok(vec![Transition::terminal(0.0)]);
        };

        let opponent = agent.opponent();
        let after_reply = after_agent.place(reply, opponent)?;

        if after_reply.has_five(opponent) {
            return Ok(vec![Transition::terminal(0.0)]);
        }
        if after_reply.is_full() {
            return Ok(vec![Transition::terminal(0.0)]);
        }

        Ok(vec![Transition {
            successor: Some(after_reply),
            probability: 1.0,
            reward: 0.0,
        }])
    }
}

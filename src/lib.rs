//! Q-learning simulation harness for Gomoku (five-in-a-row)
//!
//! This crate provides:
//! - A board-state representation with sparse-stone-set win detection
//! - An MDP formalization that folds the opponent's uniformly random reply
//!   into the environment's transition step
//! - A linear-function-approximation Q-learning agent with epsilon-greedy
//!   selection and semi-gradient temporal-difference updates
//! - A simulator running repeated episodes and collecting discounted rewards
//! - A CLI for training, evaluating, and inspecting agents
//!
//! The agent's weight map is keyed by opaque feature strings and never
//! evicted, so memory grows with every distinct feature key observed over a
//! training run. Rendering and interactive input live outside this crate;
//! the [`ports::Learner`] trait is the boundary any action source plugs
//! into.

pub mod cli;
pub mod error;
pub mod features;
pub mod gomoku;
pub mod mdp;
pub mod ports;
pub mod q_learning;
pub mod simulation;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use features::{FeatureExtractor, MeanDistanceExtractor};
pub use gomoku::{BoardState, Cell, Player};
pub use mdp::{ActionMode, GameMdp, Transition};
pub use ports::{Learner, Observer};
pub use q_learning::{QLearningAgent, SavedAgent, TrainingMetadata};
pub use simulation::{SimulationConfig, SimulationResult, Simulator};
pub use types::{FeatureKey, Position};

//! Linear-function-approximation Q-learning
//!
//! This module implements online Q-learning with a sparse linear value
//! approximation: action values are dot products of extracted features
//! with a weight map, updated by semi-gradient temporal difference steps
//! after every sampled transition.
//!
//! The weight map is keyed by opaque feature identifiers and grows with
//! every distinct key ever observed; there is no eviction, so long
//! training runs with high-resolution feature keys grow without bound.

pub mod agent;
pub mod serialization;

pub use agent::QLearningAgent;
pub use serialization::{SavedAgent, TrainingMetadata};

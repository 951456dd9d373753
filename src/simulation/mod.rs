//! Episode simulation
//!
//! Runs repeated agent-vs-environment episodes: the simulator requests an
//! action from the learner, queries the MDP's transition function, samples
//! one transition, delivers feedback, and accumulates the discounted
//! reward. Episodes run strictly sequentially; the learner's weights are
//! the only state carried from one trial to the next.

pub mod learners;
pub mod observers;
pub mod simulator;

pub use learners::{FrozenLearner, RandomLearner};
pub use observers::{JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver};
pub use simulator::{SimulationConfig, SimulationResult, Simulator};

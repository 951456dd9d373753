//! Ports (trait boundaries) between the simulation core and collaborators.
//!
//! These traits are owned by the core and implemented by adapters: the
//! Q-learning agent and the baseline learners implement [`Learner`], the
//! progress/metrics/JSONL adapters implement [`Observer`].

pub mod learner;
pub mod observer;

pub use learner::Learner;
pub use observer::Observer;

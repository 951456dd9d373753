//! Gomoku (five-in-a-row) game domain

pub mod board;
pub mod wins;

pub use board::{BoardState, Cell, Player};
pub use wins::{RUN_DIRECTIONS, WIN_LENGTH, has_five};

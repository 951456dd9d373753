//! Newtype wrappers and shared constants for the simulation harness.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate on the game board.
///
/// Coordinates are 0-indexed `(row, col)` pairs. The derived `Ord` follows
/// row-major order, which is also the order in which legal actions are
/// enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Create a new position.
    ///
    /// Positions are not bound to a board size; [`crate::gomoku::BoardState`]
    /// validates coordinates against its own dimensions.
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Shift this position by a signed `(row, col)` delta.
    ///
    /// Returns `None` when the shift would leave the non-negative coordinate
    /// space. Callers scanning for stone runs rely on this: a coordinate that
    /// cannot exist is simply never a member of a stone set.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        Some(Position {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }

    /// Manhattan distance to another position.
    pub fn manhattan_distance(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    /// Board notation: lettered row, 1-based column (`Position::new(2, 3)`
    /// displays as `C4`). Rows beyond `Z` continue spreadsheet-style (`AA`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = String::new();
        let mut row = self.row;
        loop {
            letters.insert(0, (b'A' + (row % 26) as u8) as char);
            if row < 26 {
                break;
            }
            row = row / 26 - 1;
        }
        write!(f, "{}{}", letters, self.col + 1)
    }
}

/// An opaque feature identifier produced by a feature extractor.
///
/// Keys are arbitrary strings chosen by the extractor; the learner treats
/// them as opaque map keys with a default weight of zero. The weight map
/// grows with every distinct key ever observed and is never evicted, so
/// extractors that embed continuous quantities in their keys (the reference
/// extractor does) trade memory for resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureKey(String);

impl FeatureKey {
    /// Create a feature key.
    pub fn new(key: impl Into<String>) -> Self {
        FeatureKey(key.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FeatureKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shipped simulation defaults.
pub mod reinforcement {
    /// Reward delivered when the learning agent completes five in a row.
    pub const WIN_REWARD: f64 = 5000.0;

    /// Discount factor per agent decision (not per ply).
    pub const DISCOUNT: f64 = 0.9;

    /// Default ε for ε-greedy action selection.
    pub const DEFAULT_EXPLORATION: f64 = 0.2;

    /// Default board edge length.
    pub const DEFAULT_BOARD_SIZE: usize = 8;

    /// Default number of training trials.
    pub const DEFAULT_TRIALS: usize = 200;

    /// Default cap on agent decisions per trial.
    pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
}

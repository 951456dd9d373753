//! Feature extraction for linear value approximation
//!
//! A feature extractor maps a `(state, action)` pair to a sparse vector of
//! named numeric signals. The Q-learning agent approximates action values
//! as the dot product of this vector with its weight map, so the extractor
//! is the seam where domain knowledge enters the learner.

use crate::{
    gomoku::BoardState,
    types::{FeatureKey, Position},
};

/// Feature extractor port.
///
/// Implementations return a sequence of `(key, value)` pairs. The order is
/// irrelevant and duplicate keys resolve last-write-wins; the agent
/// collapses the sequence into a map before using it.
pub trait FeatureExtractor: Send {
    /// Extract the sparse feature vector for taking `action` in `state`.
    fn extract(&self, state: &BoardState, action: Position) -> Vec<(FeatureKey, f64)>;

    /// Extractor name, used for snapshot metadata and reconstruction.
    fn name(&self) -> &str;
}

/// Reference extractor: mean Manhattan distance from the candidate action
/// to the stones of the player about to move.
///
/// The emitted value is the *negated* mean distance, so moves close to the
/// mover's existing stones score higher once their weight turns positive.
/// A player with no stones yet yields a zero-valued feature. The key embeds
/// the distance and the action, so distinct `(distance, action)` signals
/// learn distinct weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanDistanceExtractor;

impl MeanDistanceExtractor {
    pub const NAME: &'static str = "mean_distance";

    pub fn new() -> Self {
        MeanDistanceExtractor
    }
}

impl FeatureExtractor for MeanDistanceExtractor {
    fn extract(&self, state: &BoardState, action: Position) -> Vec<(FeatureKey, f64)> {
        let mover = state.player_to_move();
        let stones = state.stones(mover);

        let mean_distance = if stones.is_empty() {
            0.0
        } else {
            let total: usize = stones
                .iter()
                .map(|&stone| stone.manhattan_distance(action))
                .sum();
            total as f64 / stones.len() as f64
        };

        let key = FeatureKey::new(format!("{}|{}|{}", Self::NAME, mean_distance, action));
        vec![(key, -mean_distance)]
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

/// Reconstruct a shipped extractor from its snapshot name.
pub fn build_extractor(name: &str) -> Option<Box<dyn FeatureExtractor>> {
    match name {
        MeanDistanceExtractor::NAME => Some(Box::new(MeanDistanceExtractor::new())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gomoku::Player;

    #[test]
    fn test_no_stones_yields_zero_value() {
        let board = BoardState::new(8);
        let features = MeanDistanceExtractor::new().extract(&board, Position::new(3, 3));
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].1, 0.0);
    }

    #[test]
    fn test_mean_distance_to_movers_stones() {
        // Black has two stones; Black is to move (equal counts favor Black).
        let board = BoardState::new(8)
            .place(Position::new(0, 0), Player::Black)
            .unwrap()
            .place(Position::new(4, 4), Player::White)
            .unwrap()
            .place(Position::new(0, 2), Player::Black)
            .unwrap()
            .place(Position::new(5, 5), Player::White)
            .unwrap();

        // Distances from (0, 1): 1 and 1, mean 1.
        let features = MeanDistanceExtractor::new().extract(&board, Position::new(0, 1));
        assert_eq!(features[0].1, -1.0);
    }

    #[test]
    fn test_mover_is_side_with_fewer_stones() {
        // Black just moved, so White (fewer stones) is about to move and the
        // distance is measured against White's stones.
        let board = BoardState::new(8)
            .place(Position::new(0, 0), Player::Black)
            .unwrap()
            .place(Position::new(7, 7), Player::White)
            .unwrap()
            .place(Position::new(0, 1), Player::Black)
            .unwrap();
        assert_eq!(board.player_to_move(), Player::White);

        let features = MeanDistanceExtractor::new().extract(&board, Position::new(7, 6));
        assert_eq!(features[0].1, -1.0);
    }

    #[test]
    fn test_key_distinguishes_distance_and_action() {
        let board = BoardState::new(8)
            .place(Position::new(0, 0), Player::Black)
            .unwrap()
            .place(Position::new(7, 7), Player::White)
            .unwrap();

        let extractor = MeanDistanceExtractor::new();
        let near = extractor.extract(&board, Position::new(0, 1));
        let far = extractor.extract(&board, Position::new(6, 6));
        assert_ne!(near[0].0, far[0].0);
    }

    #[test]
    fn test_extract_is_pure() {
        let board = BoardState::new(8)
            .place(Position::new(2, 2), Player::Black)
            .unwrap();
        let extractor = MeanDistanceExtractor::new();
        let a = extractor.extract(&board, Position::new(5, 5));
        let b = extractor.extract(&board, Position::new(5, 5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_build_extractor_by_name() {
        assert!(build_extractor("mean_distance").is_some());
        assert!(build_extractor("unknown").is_none());
    }
}

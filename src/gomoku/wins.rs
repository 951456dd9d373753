//! Win detection over sparse stone sets

use std::collections::HashSet;

use crate::types::Position;

/// Number of consecutive stones that wins the game.
pub const WIN_LENGTH: usize = 5;

/// The four run directions: row, column, diagonal, anti-diagonal.
///
/// Scanning these four from every stone covers all eight compass directions,
/// because a run found from its other end walks the opposite way.
pub const RUN_DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Check whether a stone set contains five (or more) in a row.
///
/// For each stone, in sorted order, the four subsequent cells along each run
/// direction are tested for membership. There is no bounds checking:
/// coordinates outside the board are simply never members of the set, and
/// anti-diagonal steps that would leave the coordinate space fail the
/// membership test via [`Position::offset`]. Runs longer than five are
/// detected at their first stone like any other run.
///
/// Complexity is O(k) stones with O(1) amortized membership tests.
pub fn has_five(stones: &HashSet<Position>) -> bool {
    if stones.len() < WIN_LENGTH {
        return false;
    }

    let mut sorted: Vec<Position> = stones.iter().copied().collect();
    sorted.sort_unstable();

    for &stone in &sorted {
        for &(d_row, d_col) in &RUN_DIRECTIONS {
            let run_complete = (1..WIN_LENGTH).all(|step| {
                let step = step as isize;
                stone
                    .offset(d_row * step, d_col * step)
                    .is_some_and(|pos| stones.contains(&pos))
            });
            if run_complete {
                return true;
            }
        }
    }

    false
}

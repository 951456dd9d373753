//! Utility functions for the gomoku-rl crate

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::error::{Error, Result};

/// Build a standard RNG, seeded deterministically when a seed is given.
pub fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Sample an index from a cumulative probability distribution.
///
/// Draws a uniform value in `[0, 1)` and returns the first index whose
/// running probability total meets or exceeds the draw.
///
/// # Errors
///
/// Returns [`Error::InvalidDistribution`] when the probabilities are
/// exhausted before the running total reaches the draw. A well-formed
/// distribution sums to 1 and cannot trigger this.
///
/// # Examples
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use gomoku_rl::utils::cumulative_sample;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let index = cumulative_sample(&mut rng, &[0.5, 0.5]).unwrap();
/// assert!(index < 2);
///
/// // A certain outcome is always picked.
/// let index = cumulative_sample(&mut rng, &[1.0]).unwrap();
/// assert_eq!(index, 0);
/// ```
pub fn cumulative_sample<R: Rng>(rng: &mut R, probabilities: &[f64]) -> Result<usize> {
    let draw = rng.random::<f64>();
    let mut accum = 0.0;
    for (index, probability) in probabilities.iter().enumerate() {
        accum += probability;
        if accum >= draw {
            return Ok(index);
        }
    }
    Err(Error::InvalidDistribution { total: accum, draw })
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

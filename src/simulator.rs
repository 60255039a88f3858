//! Monte Carlo cross-check for the analytic fail-probability calculator.
//!
//! Generates rankings with the Yang–Stoyanovich process (each position is
//! protected independently with probability `p`) and measures how often they
//! violate an mtable. The empirical rate should agree with
//! [`crate::fail_prob::fail_probability`] up to sampling noise; the test
//! suite holds the two within 0.02 of each other on seeded runs.
//!
//! This module is the only randomness consumer in the crate. The core
//! engines stay deterministic.

use rand::Rng;

use crate::checker;
use crate::error::{FairnessError, FairnessResult};
use crate::types::Mtable;

/// Draws `trials` random rankings of length `k`, each position protected
/// with probability `p`.
///
/// Rankings are bare protected-flag sequences; scores are irrelevant to the
/// fairness check. Pass a seeded rng for reproducible runs.
///
/// # Panics
///
/// Panics if `p` is not in `[0, 1]` (propagated from
/// [`Rng::random_bool`]).
pub fn generate_rankings<R: Rng + ?Sized>(
    trials: usize,
    k: usize,
    p: f64,
    rng: &mut R,
) -> Vec<Vec<bool>> {
    (0..trials)
        .map(|_| (0..k).map(|_| rng.random_bool(p)).collect())
        .collect()
}

/// Fraction of the given rankings that violate the mtable.
///
/// # Errors
///
/// [`FairnessError::InvalidParameter`] on an empty trial set,
/// [`FairnessError::LengthMismatch`] when any ranking's length differs from
/// the table's.
pub fn empirical_fail_rate(rankings: &[Vec<bool>], mtable: &Mtable) -> FairnessResult<f64> {
    if rankings.is_empty() {
        return Err(FairnessError::InvalidParameter {
            field: "rankings",
            value: "0".into(),
            reason: "an empirical fail rate needs at least one trial".into(),
        });
    }
    let mut failures = 0_usize;
    for flags in rankings {
        if !checker::satisfies_mtable(flags, mtable)? {
            failures += 1;
        }
    }
    Ok(failures as f64 / rankings.len() as f64)
}

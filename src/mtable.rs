//! Minimum-protected-count threshold generation ("mtable").
//!
//! For a ranking of length `k` with target protected proportion `p` and
//! significance level `alpha`, the threshold for rank `i` is the one-sided
//! binomial quantile: the smallest count `m` such that
//! `P(Binomial(i, p) <= m) >= alpha`. A ranking whose running protected
//! count ever drops below the threshold is "surprisingly unfair" at
//! significance `alpha` (Zehlike et al., CIKM 2017).
//!
//! Two entry points:
//! - [`generate_unadjusted`]: `alpha` is used as given, so each rank is
//!   tested at significance `alpha` individually.
//! - [`generate_adjusted`]: `alpha` is first calibrated for the family of
//!   `k` sequential tests (see [`crate::fail_prob::calibrate`]), so the
//!   *overall* false-flag probability matches `alpha`.
//!
//! The cumulative binomial is evaluated with a log-space pmf ratio
//! recurrence; individual terms may underflow for large `i` at extreme `p`,
//! but any term small enough to underflow is also too small to move the CDF
//! across an `alpha >= 0.001` threshold.

use tracing::{debug, instrument};

use crate::error::{FairnessError, FairnessResult};
use crate::fail_prob;
use crate::types::Mtable;

/// Generates the threshold table with `alpha` used as given.
///
/// # Errors
///
/// [`FairnessError::InvalidParameter`] when `k < 1` or `alpha` is outside
/// `(0, 1)`. Otherwise the computation is a total function.
#[instrument(name = "fairrank::generate_unadjusted")]
pub fn generate_unadjusted(k: usize, p: f64, alpha: f64) -> FairnessResult<Mtable> {
    validate_engine_inputs(k, p, alpha)?;
    let table = quantile_table(k, p, alpha);
    debug!(
        target: "fairrank.mtable",
        k,
        mass = table.mass(),
        "generated unadjusted mtable"
    );
    Ok(table)
}

/// Generates the threshold table with `alpha` calibrated for the family of
/// `k` sequential per-rank tests.
///
/// Identity: this equals [`generate_unadjusted`] invoked with the
/// calibrated alpha from [`fail_prob::calibrate`].
///
/// # Errors
///
/// [`FairnessError::InvalidParameter`] when `k < 1` or `alpha` is outside
/// `(0, 1)`.
#[instrument(name = "fairrank::generate_adjusted")]
pub fn generate_adjusted(k: usize, p: f64, alpha: f64) -> FairnessResult<Mtable> {
    validate_engine_inputs(k, p, alpha)?;
    let calibration = fail_prob::calibrate(k, p, alpha)?;
    let table = quantile_table(k, p, calibration.adjusted_alpha);
    debug!(
        target: "fairrank.mtable",
        k,
        adjusted_alpha = calibration.adjusted_alpha,
        mass = table.mass(),
        "generated adjusted mtable"
    );
    Ok(table)
}

/// Builds the quantile table without parameter validation.
///
/// The calibrator probes candidate alphas through this path, including
/// values far below the facade's sane range.
pub(crate) fn quantile_table(k: usize, p: f64, alpha: f64) -> Mtable {
    let thresholds = (1..=k).map(|i| binomial_quantile(i, p, alpha)).collect();
    Mtable::new(thresholds)
}

/// Smallest `m` with `P(Binomial(n, p) <= m) >= alpha`.
///
/// Walks the CDF upward using
/// `pmf(j+1) = pmf(j) * (n-j)/(j+1) * p/(1-p)`, carried in log space.
fn binomial_quantile(n: usize, p: f64, alpha: f64) -> usize {
    let log_odds = (p / (1.0 - p)).ln();
    let mut log_pmf = (n as f64) * (1.0 - p).ln();
    let mut cdf = log_pmf.exp();
    let mut m = 0;
    while cdf < alpha && m < n {
        log_pmf += (((n - m) as f64) / ((m + 1) as f64)).ln() + log_odds;
        cdf += log_pmf.exp();
        m += 1;
    }
    m
}

/// Shared minimal contract for the generator and the calibrator: the facade
/// layers the two-tier policy on top, the engines only reject nonsense.
pub(crate) fn validate_engine_inputs(k: usize, p: f64, alpha: f64) -> FairnessResult<()> {
    if k < 1 {
        return Err(FairnessError::InvalidParameter {
            field: "k",
            value: k.to_string(),
            reason: "threshold generation needs at least one rank".into(),
        });
    }
    if !p.is_finite() || p <= 0.0 || p >= 1.0 {
        return Err(FairnessError::InvalidParameter {
            field: "p",
            value: p.to_string(),
            reason: "target proportion must be strictly between 0 and 1".into(),
        });
    }
    if !alpha.is_finite() || alpha <= 0.0 || alpha >= 1.0 {
        return Err(FairnessError::InvalidParameter {
            field: "alpha",
            value: alpha.to_string(),
            reason: "significance level must be strictly between 0 and 1".into(),
        });
    }
    Ok(())
}

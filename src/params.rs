//! Fairness parameters and their two-tier validation.
//!
//! Validation distinguishes *sane* ranges (hard errors) from *tested* ranges
//! (advisory warnings). Outside the tested range the numerics are
//! best-effort but the computation proceeds; outside the sane range the call
//! is a programming error and fails immediately.
//!
//! | param | hard error outside | warning outside |
//! |-------|--------------------|-----------------|
//! | `k`     | `k >= 2`           | `[10, 400]`     |
//! | `p`     | `(0.0, 1.0)`       | `[0.02, 0.98]`  |
//! | `alpha` | `[0.001, 0.5]`     | `[0.01, 0.15]`  |

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{FairnessError, FairnessResult};

// Tested envelope; values outside produce advisories, not errors.
const TESTED_K: std::ops::RangeInclusive<usize> = 10..=400;
const TESTED_P: std::ops::RangeInclusive<f64> = 0.02..=0.98;
const TESTED_ALPHA: std::ops::RangeInclusive<f64> = 0.01..=0.15;

/// The three parameters fixed for the lifetime of one generation,
/// calibration, or re-ranking operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairnessParams {
    /// Total ranking length (top-k). Default: 10.
    pub k: usize,
    /// Target proportion of protected items, in (0, 1). Default: 0.2.
    pub p: f64,
    /// Significance level: the tolerated probability that a truly fair
    /// ranking is flagged as unfair. Default: 0.1.
    pub alpha: f64,
}

impl Default for FairnessParams {
    fn default() -> Self {
        Self {
            k: 10,
            p: 0.2,
            alpha: 0.1,
        }
    }
}

impl FairnessParams {
    /// Creates a parameter set without validating it; call
    /// [`validate`](Self::validate) before handing it to the engines.
    #[must_use]
    pub const fn new(k: usize, p: f64, alpha: f64) -> Self {
        Self { k, p, alpha }
    }

    /// Validates the parameter set under the two-tier policy.
    ///
    /// # Errors
    ///
    /// [`FairnessError::InvalidParameter`] when a value falls outside its
    /// sane range. Values that are sane but untested emit a `tracing::warn!`
    /// advisory and pass.
    pub fn validate(&self) -> FairnessResult<()> {
        if self.k < 2 {
            return Err(FairnessError::InvalidParameter {
                field: "k",
                value: self.k.to_string(),
                reason: "ranking length must be at least 2".into(),
            });
        }
        if !TESTED_K.contains(&self.k) {
            warn!(
                target: "fairrank.params",
                k = self.k,
                "k is outside the tested range [10, 400]; numerics are best-effort"
            );
        }

        if !self.p.is_finite() || self.p <= 0.0 || self.p >= 1.0 {
            return Err(FairnessError::InvalidParameter {
                field: "p",
                value: self.p.to_string(),
                reason: "target proportion must be strictly between 0 and 1".into(),
            });
        }
        if !TESTED_P.contains(&self.p) {
            warn!(
                target: "fairrank.params",
                p = self.p,
                "p is outside the tested range [0.02, 0.98]; numerics are best-effort"
            );
        }

        if !self.alpha.is_finite() || self.alpha < 0.001 || self.alpha > 0.5 {
            return Err(FairnessError::InvalidParameter {
                field: "alpha",
                value: self.alpha.to_string(),
                reason: "significance level must be between 0.001 and 0.5".into(),
            });
        }
        if !TESTED_ALPHA.contains(&self.alpha) {
            warn!(
                target: "fairrank.params",
                alpha = self.alpha,
                "alpha is outside the tested range [0.01, 0.15]; numerics are best-effort"
            );
        }

        Ok(())
    }
}

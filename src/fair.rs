//! The `FairRanker` facade: validated parameters, a per-instance mtable
//! memo, and the composed fairness operations.
//!
//! Engines are pure functions of their inputs, so the facade's cache is an
//! optimization, not a correctness requirement: one slot per table mode,
//! guarded by a `Mutex`. Concurrent callers serialize on the lock; a
//! poisoned lock is a bug in this crate, not a caller-recoverable state.

use std::sync::Mutex;

use tracing::{debug, instrument};

use crate::checker;
use crate::error::FairnessResult;
use crate::fail_prob;
use crate::mtable;
use crate::params::FairnessParams;
use crate::rerank;
use crate::types::{CalibrationResult, Mtable, RankingItem, ReRankOutcome};

/// Validates `(k, p, alpha)` once, then exposes the threshold generator,
/// the calibrator, the checker, and the re-ranker under those parameters.
///
/// Tables are memoized per instance and per mode; two instances never share
/// state, so dropping the ranker discards the cache.
#[derive(Debug)]
pub struct FairRanker {
    params: FairnessParams,
    cache: Mutex<MtableCache>,
}

#[derive(Debug, Default)]
struct MtableCache {
    unadjusted: Option<Mtable>,
    adjusted: Option<(CalibrationResult, Mtable)>,
}

impl FairRanker {
    /// Builds a ranker for the given parameters.
    ///
    /// # Errors
    ///
    /// [`crate::FairnessError::InvalidParameter`] under the two-tier policy
    /// of [`FairnessParams::validate`]: sane-but-untested values pass with a
    /// warning, insane values fail here and nowhere later.
    pub fn new(k: usize, p: f64, alpha: f64) -> FairnessResult<Self> {
        Self::from_params(FairnessParams::new(k, p, alpha))
    }

    /// Builds a ranker from an existing parameter set.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn from_params(params: FairnessParams) -> FairnessResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            cache: Mutex::new(MtableCache::default()),
        })
    }

    /// Ranking length these parameters cover.
    #[must_use]
    pub fn k(&self) -> usize {
        self.params.k
    }

    /// Target protected proportion.
    #[must_use]
    pub fn p(&self) -> f64 {
        self.params.p
    }

    /// Significance level as supplied by the caller (never the calibrated
    /// value; see [`adjust_alpha`](Self::adjust_alpha) for that).
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.params.alpha
    }

    /// The threshold table with alpha used as given.
    ///
    /// Memoized: the first call computes, later calls clone the cached
    /// table.
    ///
    /// # Errors
    ///
    /// Propagates generator errors; unreachable for parameters this ranker
    /// validated, kept in the signature so callers handle one shape.
    pub fn unadjusted_mtable(&self) -> FairnessResult<Mtable> {
        let mut cache = self.cache.lock().expect("mtable cache lock");
        if let Some(table) = &cache.unadjusted {
            debug!(target: "fairrank.fair", mode = "unadjusted", "mtable cache hit");
            return Ok(table.clone());
        }
        let table = mtable::generate_unadjusted(self.params.k, self.params.p, self.params.alpha)?;
        cache.unadjusted = Some(table.clone());
        Ok(table)
    }

    /// The threshold table with alpha calibrated for the family of `k`
    /// sequential per-rank checks. Memoized together with the calibration.
    ///
    /// # Errors
    ///
    /// Propagates generator and calibrator errors.
    pub fn adjusted_mtable(&self) -> FairnessResult<Mtable> {
        Ok(self.adjusted_entry()?.1)
    }

    /// Calibrates alpha for this ranker's parameters.
    ///
    /// # Errors
    ///
    /// Propagates calibrator errors.
    pub fn adjust_alpha(&self) -> FairnessResult<CalibrationResult> {
        Ok(self.adjusted_entry()?.0)
    }

    fn adjusted_entry(&self) -> FairnessResult<(CalibrationResult, Mtable)> {
        let mut cache = self.cache.lock().expect("mtable cache lock");
        if let Some((calibration, table)) = &cache.adjusted {
            debug!(target: "fairrank.fair", mode = "adjusted", "mtable cache hit");
            return Ok((*calibration, table.clone()));
        }
        let calibration = fail_prob::calibrate(self.params.k, self.params.p, self.params.alpha)?;
        let table =
            mtable::generate_unadjusted(self.params.k, self.params.p, calibration.adjusted_alpha)?;
        cache.adjusted = Some((calibration, table.clone()));
        Ok((calibration, table))
    }

    /// Exact probability that a fair Bernoulli(`p`) ranking of length `k`
    /// violates the given table.
    ///
    /// # Errors
    ///
    /// [`crate::FairnessError::LengthMismatch`] when the table does not
    /// cover `k` ranks.
    pub fn fail_probability(&self, mtable: &Mtable) -> FairnessResult<f64> {
        fail_prob::fail_probability(self.params.k, self.params.p, mtable)
    }

    /// Whether a ranking satisfies the calibrated thresholds.
    ///
    /// # Errors
    ///
    /// [`crate::FairnessError::LengthMismatch`] when the ranking is not
    /// exactly `k` items.
    pub fn is_fair(&self, ranking: &[RankingItem]) -> FairnessResult<bool> {
        let table = self.adjusted_mtable()?;
        checker::is_fair(ranking, &table)
    }

    /// Re-ranks a candidate set so the top-`k` result satisfies the
    /// calibrated thresholds with minimal disruption to score order.
    ///
    /// Candidates may arrive in any order: they are stable-sorted by
    /// descending score (ties keep their original relative order) and
    /// partitioned by the protected flag before the constrained merge.
    ///
    /// # Errors
    ///
    /// [`crate::FairnessError::InsufficientCandidates`] when fewer than `k`
    /// candidates are supplied.
    #[instrument(name = "fairrank::FairRanker::re_rank", skip_all, fields(k = self.params.k, candidates = candidates.len()))]
    pub fn re_rank(&self, candidates: &[RankingItem]) -> FairnessResult<ReRankOutcome> {
        let table = self.adjusted_mtable()?;
        let mut sorted: Vec<RankingItem> = candidates.to_vec();
        sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
        let (protected, non_protected): (Vec<RankingItem>, Vec<RankingItem>) =
            sorted.into_iter().partition(|item| item.is_protected);
        rerank::re_rank(&table, &protected, &non_protected)
    }
}

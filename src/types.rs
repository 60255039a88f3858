//! Result and data types shared across the fairrank engines.

use serde::{Deserialize, Serialize};

// ─── Ranking items ──────────────────────────────────────────────────────────

/// One candidate in a ranking: an opaque identifier, a relevance score, and
/// the protected-group flag.
///
/// Items are immutable once constructed and are never mutated by the engines;
/// callers own them and the engines clone what they emit. Score ties are
/// broken by the items' original relative order (all sorts in this crate are
/// stable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingItem {
    /// Caller-defined identifier. Only compared for equality, never parsed.
    pub id: String,
    /// Relevance score; higher ranks earlier.
    pub score: f64,
    /// Whether the item belongs to the protected group.
    pub is_protected: bool,
}

impl RankingItem {
    /// Creates a new ranking item.
    #[must_use]
    pub fn new(id: impl Into<String>, score: f64, is_protected: bool) -> Self {
        Self {
            id: id.into(),
            score,
            is_protected,
        }
    }
}

// ─── Mtable ─────────────────────────────────────────────────────────────────

/// Per-rank minimum cumulative counts of protected items.
///
/// `thresholds[i]` is the minimum number of protected items required among
/// the first `i + 1` ranking positions. A correctly generated table is
/// non-decreasing and never demands more protected items than positions seen
/// (`thresholds[i] <= i + 1`); both are consequences of the binomial quantile
/// computation, verified by property tests rather than enforced here.
///
/// Tables are pure functions of `(k, p, alpha)`: identical inputs produce
/// identical tables, which is what makes the facade memo sound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mtable {
    thresholds: Vec<usize>,
}

impl Mtable {
    /// Wraps an explicit threshold sequence, e.g. one restored from storage.
    #[must_use]
    pub fn new(thresholds: Vec<usize>) -> Self {
        Self { thresholds }
    }

    /// Number of ranking positions the table covers (k).
    #[must_use]
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    /// Whether the table covers zero positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// The thresholds as a slice, index 0 = rank 1.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.thresholds
    }

    /// Iterates the per-rank thresholds in rank order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.thresholds.iter().copied()
    }

    /// Total mass of the table (sum of all thresholds).
    ///
    /// Two tables with equal mass generated from the same `(k, p)` are
    /// identical, so mass is a cheap strictness measure: the calibrator stops
    /// bisecting once its bracket endpoints differ by at most one unit of
    /// mass, because the threshold step function has no finer granularity.
    #[must_use]
    pub fn mass(&self) -> usize {
        self.thresholds.iter().sum()
    }
}

impl std::ops::Index<usize> for Mtable {
    type Output = usize;

    fn index(&self, index: usize) -> &usize {
        &self.thresholds[index]
    }
}

// ─── Calibration ────────────────────────────────────────────────────────────

/// Outcome of family-wise alpha calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    /// The calibrated significance level: generating an unadjusted table at
    /// this alpha yields the family-wise-corrected thresholds.
    pub adjusted_alpha: f64,
    /// The exact fail probability achieved by the table generated at
    /// `adjusted_alpha`. Diagnostic; close to, but rarely exactly, the
    /// requested alpha because the threshold family is a step function.
    pub fail_probability: f64,
}

// ─── Re-ranking ─────────────────────────────────────────────────────────────

/// A re-ranked top-k list plus the fairness feasibility flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReRankOutcome {
    /// The output ranking, length k.
    pub ranking: Vec<RankingItem>,
    /// True when every threshold was met. False when the protected queue ran
    /// dry while a threshold was unmet: the ranking is still complete and
    /// score-greedy, but the fairness guarantee no longer holds from the
    /// first starved rank onward. Callers decide whether that is fatal.
    pub feasible: bool,
}

//! Constrained re-ranking: merge two score-sorted queues under an mtable.
//!
//! Two index cursors over pre-sorted inputs, one forward pass, O(k). At
//! each rank the threshold decides whether the next slot is forced: when
//! the running protected count is below the threshold, only a protected
//! item keeps the ranking compliant — the table is non-decreasing, so a
//! deficit never shrinks on its own. Unforced slots go to the
//! higher-scoring head, ties to the protected one (meeting future
//! thresholds early costs nothing now and loosens every later rank).
//!
//! This greedy is exchange-optimal for monotone threshold constraints: any
//! compliant ranking can be rewritten into the greedy one by swaps that
//! never decrease a prefix's total score.

use tracing::{instrument, warn};

use crate::error::{FairnessError, FairnessResult};
use crate::types::{Mtable, RankingItem, ReRankOutcome};

/// Merges `protected` and `non_protected` — each sorted descending by
/// score — into a ranking of `mtable.len()` items satisfying the table.
///
/// When the protected queue runs dry while a threshold is still unmet, the
/// merge degrades gracefully: remaining slots fill from the other queue in
/// score order, the outcome is flagged [`ReRankOutcome::feasible`]` = false`,
/// and a warning is emitted. The ranking is still complete and score-greedy;
/// callers decide whether the lost guarantee is fatal.
///
/// # Errors
///
/// [`FairnessError::InsufficientCandidates`] when the queues together hold
/// fewer items than the table has ranks.
#[instrument(
    name = "fairrank::re_rank",
    skip_all,
    fields(
        k = mtable.len(),
        protected = protected.len(),
        non_protected = non_protected.len(),
    )
)]
pub fn re_rank(
    mtable: &Mtable,
    protected: &[RankingItem],
    non_protected: &[RankingItem],
) -> FairnessResult<ReRankOutcome> {
    let k = mtable.len();
    let available = protected.len() + non_protected.len();
    if available < k {
        return Err(FairnessError::InsufficientCandidates {
            required: k,
            available,
        });
    }

    let mut ranking = Vec::with_capacity(k);
    let mut next_protected = 0_usize;
    let mut next_other = 0_usize;
    let mut protected_count = 0_usize;
    let mut feasible = true;

    for rank in 0..k {
        let deficit = protected_count < mtable[rank];
        let take_protected = if deficit && next_protected < protected.len() {
            true
        } else {
            if deficit && feasible {
                feasible = false;
                warn!(
                    target: "fairrank.rerank",
                    rank = rank + 1,
                    required = mtable[rank],
                    supplied = protected.len(),
                    "protected queue exhausted before its threshold; \
                     fairness guarantee lost from this rank onward"
                );
            }
            match (protected.get(next_protected), non_protected.get(next_other)) {
                (Some(head), Some(other)) => head.score >= other.score,
                (Some(_), None) => true,
                _ => false,
            }
        };

        if take_protected {
            ranking.push(protected[next_protected].clone());
            next_protected += 1;
            protected_count += 1;
        } else {
            ranking.push(non_protected[next_other].clone());
            next_other += 1;
        }
    }

    Ok(ReRankOutcome { ranking, feasible })
}

//! Threshold replay: does a concrete ranking satisfy an mtable?
//!
//! This is the ground truth the re-ranker's output must satisfy and the
//! generator's tables must encode. One forward pass, accumulating the
//! protected count; the first rank where the count falls below its
//! threshold decides the verdict.

use crate::error::{FairnessError, FairnessResult};
use crate::types::{Mtable, RankingItem};

/// Checks a ranking of items against an mtable.
///
/// Returns `false` at the first rank whose running protected count is below
/// the threshold, `true` when no rank violates it.
///
/// # Errors
///
/// [`FairnessError::LengthMismatch`] when the ranking and the table cover
/// different numbers of ranks.
pub fn is_fair(ranking: &[RankingItem], mtable: &Mtable) -> FairnessResult<bool> {
    if ranking.len() != mtable.len() {
        return Err(FairnessError::LengthMismatch {
            expected: mtable.len(),
            found: ranking.len(),
        });
    }
    Ok(replay(ranking.iter().map(|item| item.is_protected), mtable))
}

/// Checks a bare protected-flag sequence against an mtable.
///
/// The simulator works on flag sequences rather than scored items; this is
/// the same replay without the item wrapper.
///
/// # Errors
///
/// [`FairnessError::LengthMismatch`] when the flag sequence and the table
/// cover different numbers of ranks.
pub fn satisfies_mtable(flags: &[bool], mtable: &Mtable) -> FairnessResult<bool> {
    if flags.len() != mtable.len() {
        return Err(FairnessError::LengthMismatch {
            expected: mtable.len(),
            found: flags.len(),
        });
    }
    Ok(replay(flags.iter().copied(), mtable))
}

fn replay(flags: impl Iterator<Item = bool>, mtable: &Mtable) -> bool {
    let mut protected = 0_usize;
    for (rank, is_protected) in flags.enumerate() {
        if is_protected {
            protected += 1;
        }
        if protected < mtable[rank] {
            return false;
        }
    }
    true
}

/// Unified error type for the fairrank threshold, calibration, and re-ranking
/// engines.
///
/// Every variant carries the offending values and an actionable message. All
/// variants are programming errors: the engines are deterministic pure
/// functions, so retrying with unchanged inputs is meaningless. Infeasible
/// fairness during re-ranking is deliberately NOT an error — see
/// [`ReRankOutcome::feasible`](crate::ReRankOutcome).
#[derive(Debug, thiserror::Error)]
pub enum FairnessError {
    /// A parameter is outside its sane range (not merely untested — untested
    /// ranges produce a `tracing::warn!` advisory and proceed).
    #[error("Invalid parameter {field} = {value}: {reason}")]
    InvalidParameter {
        /// Which parameter failed validation.
        field: &'static str,
        /// The rejected value, rendered for the message.
        value: String,
        /// Why it is invalid, including the accepted range.
        reason: String,
    },

    /// A ranking and an mtable of different lengths were paired. Thresholds
    /// are positional, so the comparison is meaningless.
    #[error(
        "Ranking has {found} items but the mtable has {expected} thresholds; generate the mtable with k = {found} or truncate the ranking."
    )]
    LengthMismatch {
        /// The mtable length.
        expected: usize,
        /// The ranking length.
        found: usize,
    },

    /// The re-ranker was asked to fill more positions than candidates exist.
    #[error(
        "Re-ranking needs at least {required} candidates but only {available} were supplied across both queues."
    )]
    InsufficientCandidates {
        /// Positions to fill (the mtable length).
        required: usize,
        /// Combined size of the two candidate queues.
        available: usize,
    },
}

/// Convenience alias used throughout the crate.
pub type FairnessResult<T> = Result<T, FairnessError>;

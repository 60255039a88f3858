//! Statistical fairness constraints for top-k rankings, after the FA*IR
//! model (Zehlike et al., CIKM 2017).
//!
//! Given a ranking length `k`, a target protected proportion `p`, and a
//! significance level `alpha`, this crate:
//!
//! - **Generates thresholds** ([`mtable`]): the per-rank minimum protected
//!   counts a ranking must meet to not be "surprisingly unfair" under a
//!   Binomial(`i`, `p`) model.
//! - **Calibrates alpha** ([`fail_prob`]): an exact dynamic program computes
//!   the probability that a truly fair ranking trips any of the `k`
//!   sequential checks, and a bisection adjusts alpha so that family-wise
//!   rate matches the target.
//! - **Re-ranks** ([`rerank`]): merges protected and non-protected
//!   candidate queues into a ranking that provably satisfies the thresholds
//!   while disturbing score order as little as possible.
//! - **Checks** ([`checker`]): replays the thresholds against a concrete
//!   ranking.
//!
//! [`FairRanker`] ties these together behind validated parameters and a
//! per-instance table memo; [`simulator`] cross-checks the analytic fail
//! probability by Monte Carlo.
//!
//! ```
//! use fairrank::{FairRanker, RankingItem};
//!
//! let ranker = FairRanker::new(10, 0.25, 0.1)?;
//! let candidates: Vec<RankingItem> = (0..12)
//!     .map(|i| RankingItem::new(format!("doc-{i}"), f64::from(100 - i), i % 3 == 0))
//!     .collect();
//! let outcome = ranker.re_rank(&candidates)?;
//! assert_eq!(outcome.ranking.len(), 10);
//! assert!(outcome.feasible);
//! assert!(ranker.is_fair(&outcome.ranking)?);
//! # Ok::<(), fairrank::FairnessError>(())
//! ```

pub mod checker;
pub mod error;
pub mod fail_prob;
pub mod fair;
pub mod mtable;
pub mod params;
pub mod rerank;
pub mod simulator;
pub mod types;

pub use error::{FairnessError, FairnessResult};
pub use fair::FairRanker;
pub use params::FairnessParams;
pub use types::{CalibrationResult, Mtable, RankingItem, ReRankOutcome};

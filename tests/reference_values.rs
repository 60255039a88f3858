//! End-to-end scenarios over the FA*IR reference parameter triples.

use fairrank::{FairRanker, RankingItem};

/// Items with `score == id`, mirroring the reference fixtures: the flag
/// sequence is given top rank first.
fn ranking_from_flags(flags: &[bool]) -> Vec<RankingItem> {
    let k = flags.len();
    flags
        .iter()
        .enumerate()
        .map(|(i, &is_protected)| RankingItem::new(format!("{}", k - i), (k - i) as f64, is_protected))
        .collect()
}

#[test]
fn unadjusted_mtables_match_reference() {
    let cases: [(usize, f64, f64, &[usize]); 3] = [
        (10, 0.2, 0.15, &[0, 0, 0, 0, 0, 0, 0, 0, 1, 1]),
        (
            20,
            0.25,
            0.1,
            &[0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 3],
        ),
        (
            30,
            0.3,
            0.05,
            &[
                0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 4, 4, 4, 4,
                5, 5, 5,
            ],
        ),
    ];
    for (k, p, alpha, expected) in cases {
        let ranker = FairRanker::new(k, p, alpha).unwrap();
        let table = ranker.unadjusted_mtable().unwrap();
        assert_eq!(table.as_slice(), expected, "unadjusted mtable for k={k}");
    }
}

#[test]
fn adjusted_mtables_match_reference() {
    let cases: [(usize, f64, f64, &[usize]); 3] = [
        (10, 0.2, 0.15, &[0, 0, 0, 0, 0, 0, 0, 0, 1, 1]),
        (
            20,
            0.25,
            0.1,
            &[0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2],
        ),
        (
            30,
            0.3,
            0.05,
            &[
                0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 4,
                4, 4, 4,
            ],
        ),
    ];
    for (k, p, alpha, expected) in cases {
        let ranker = FairRanker::new(k, p, alpha).unwrap();
        let table = ranker.adjusted_mtable().unwrap();
        assert_eq!(table.as_slice(), expected, "adjusted mtable for k={k}");
    }
}

#[test]
fn adjusted_alphas_match_reference() {
    for (k, p, alpha, expected) in [
        (10, 0.2, 0.15, 0.15),
        (20, 0.25, 0.1, 0.078_125),
        (30, 0.3, 0.15, 0.075),
    ] {
        let ranker = FairRanker::new(k, p, alpha).unwrap();
        let calibration = ranker.adjust_alpha().unwrap();
        assert!(
            (calibration.adjusted_alpha - expected).abs() < 1e-4,
            "adjusted alpha {} for k={k}, expected {expected}",
            calibration.adjusted_alpha
        );
    }
}

#[test]
fn fail_probabilities_match_reference() {
    for (k, p, alpha, expected) in [
        (10, 0.2, 0.15, 0.134_217_728_000_000_65),
        (20, 0.25, 0.1, 0.105_152_473_552_152_51),
        (30, 0.3, 0.05, 0.045_972_969_275_582_81),
    ] {
        let ranker = FairRanker::new(k, p, alpha).unwrap();
        let table = ranker.adjusted_mtable().unwrap();
        let fail = ranker.fail_probability(&table).unwrap();
        assert!(
            (fail - expected).abs() < 1e-4,
            "fail probability {fail} for k={k}, expected {expected}"
        );
    }
}

#[test]
fn calibration_identity_holds() {
    for (k, p, alpha) in [(10, 0.2, 0.15), (20, 0.25, 0.1), (30, 0.3, 0.05)] {
        let ranker = FairRanker::new(k, p, alpha).unwrap();
        let adjusted = ranker.adjusted_mtable().unwrap();
        let calibration = ranker.adjust_alpha().unwrap();

        let recalibrated = FairRanker::new(k, p, calibration.adjusted_alpha).unwrap();
        assert_eq!(adjusted, recalibrated.unadjusted_mtable().unwrap());
    }
}

#[test]
fn known_fair_rankings_pass() {
    let cases: [(usize, f64, f64, &[bool]); 2] = [
        (
            20,
            0.25,
            0.1,
            &[
                false, true, false, false, false, false, false, true, false, true, false, false,
                true, false, false, true, true, false, false, false,
            ],
        ),
        (
            20,
            0.3,
            0.1,
            &[
                false, true, false, true, true, false, false, true, false, true, false, false,
                true, false, false, true, true, false, false, false,
            ],
        ),
    ];
    for (k, p, alpha, flags) in cases {
        let ranker = FairRanker::new(k, p, alpha).unwrap();
        let ranking = ranking_from_flags(flags);
        assert!(ranker.is_fair(&ranking).unwrap(), "p={p} ranking should pass");
    }
}

#[test]
fn unfair_rankings_are_repaired_by_re_ranking() {
    // All protected items buried at the bottom of the score order.
    let cases: [(usize, f64, f64, &[bool]); 2] = [
        (
            20,
            0.25,
            0.1,
            &[
                false, false, false, false, false, false, false, false, false, false, false,
                false, false, false, false, true, true, true, true, true,
            ],
        ),
        (
            20,
            0.3,
            0.1,
            &[
                false, false, false, false, false, false, false, false, false, true, true, false,
                true, false, false, true, true, true, true, true,
            ],
        ),
    ];
    for (k, p, alpha, flags) in cases {
        let ranker = FairRanker::new(k, p, alpha).unwrap();
        let ranking = ranking_from_flags(flags);

        assert!(!ranker.is_fair(&ranking).unwrap(), "p={p} input should fail");

        let outcome = ranker.re_rank(&ranking).unwrap();
        assert!(outcome.feasible, "enough protected supply for p={p}");
        assert_eq!(outcome.ranking.len(), k);
        assert!(ranker.is_fair(&outcome.ranking).unwrap());

        let mut input_ids: Vec<&str> = ranking.iter().map(|item| item.id.as_str()).collect();
        let mut output_ids: Vec<&str> =
            outcome.ranking.iter().map(|item| item.id.as_str()).collect();
        input_ids.sort_unstable();
        output_ids.sort_unstable();
        assert_eq!(input_ids, output_ids, "re-ranking must only permute");
    }
}

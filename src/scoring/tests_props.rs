//! Property-based tests for the classification invariants.

use std::cmp::Ordering;

use proptest::collection::vec;
use proptest::prelude::*;

use super::{compare_tie_break, race_count, rank, ScoreToken, StatusCode};
use crate::regatta::types::{Entrant, ScoreSheet};

fn token() -> impl Strategy<Value = ScoreToken> {
    prop_oneof![
        6 => (1u32..15).prop_map(|n| ScoreToken::Finish(n as f64)),
        1 => prop::sample::select(vec!["DNS", "DNF", "OCS", "DSQ", "RET", "DNC", "RDG"])
            .prop_map(ScoreToken::parse),
        1 => Just(ScoreToken::Absent),
        1 => Just(ScoreToken::Unknown("??".to_string())),
    ]
}

/// A roster of unique sailors plus a ragged score sheet. Some sailors have
/// no entry on the sheet at all.
fn class() -> impl Strategy<Value = (Vec<Entrant>, ScoreSheet)> {
    (0usize..8, 0usize..7).prop_flat_map(|(sailors, races)| {
        vec(proptest::option::weighted(0.85, vec(token(), 0..=races)), sailors).prop_map(
            |rows| {
                let entrants: Vec<Entrant> = (0..rows.len())
                    .map(|i| Entrant::new(format!("s{}", i)))
                    .collect();
                let sheet: ScoreSheet = rows
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, row)| row.map(|tokens| (format!("s{}", i), tokens)))
                    .collect();
                (entrants, sheet)
            },
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: ranking is a pure function of its inputs
    #[test]
    fn prop_deterministic((entrants, sheet) in class()) {
        prop_assert_eq!(rank(&entrants, &sheet), rank(&entrants, &sheet));
    }

    /// Property: every roster entry appears exactly once, ranks are 1..=n
    #[test]
    fn prop_complete((entrants, sheet) in class()) {
        let ranked = rank(&entrants, &sheet);
        prop_assert_eq!(ranked.len(), entrants.len());

        let mut ids: Vec<&str> = ranked.iter().map(|e| e.sailor_id.as_str()).collect();
        ids.sort_unstable();
        let mut expected: Vec<&str> = entrants.iter().map(|e| e.sailor_id.as_str()).collect();
        expected.sort_unstable();
        prop_assert_eq!(ids, expected);

        for (idx, entry) in ranked.iter().enumerate() {
            prop_assert_eq!(entry.rank, idx + 1);
        }
    }

    /// Property: totals never decrease down the table, and equal totals are
    /// ordered by tie-break vector
    #[test]
    fn prop_ordered((entrants, sheet) in class()) {
        let ranked = rank(&entrants, &sheet);
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(
                a.total_points <= b.total_points,
                "{} ({}) ranked above {} ({})",
                a.sailor_id,
                a.total_points,
                b.sailor_id,
                b.total_points
            );
            if a.total_points == b.total_points {
                prop_assert_ne!(compare_tie_break(&a.tie_break, &b.tie_break), Ordering::Greater);
            }
        }
    }

    /// Property: full ties keep roster order
    #[test]
    fn prop_stable_on_full_ties((entrants, sheet) in class()) {
        let ranked = rank(&entrants, &sheet);
        let roster_pos = |id: &str| entrants.iter().position(|e| e.sailor_id == id);
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.total_points == b.total_points
                && compare_tie_break(&a.tie_break, &b.tie_break) == Ordering::Equal
            {
                prop_assert!(roster_pos(&a.sailor_id) < roster_pos(&b.sailor_id));
            }
        }
    }

    /// Property: a discard only happens from four races on, and then it is
    /// the first of the worst scores
    #[test]
    fn prop_discard_rule((entrants, sheet) in class()) {
        let races = race_count(&sheet);
        for entry in rank(&entrants, &sheet) {
            prop_assert_eq!(entry.race_scores.len(), races);
            let sailed = entry.tokens.iter().any(|t| !t.is_absent());
            match entry.discarded_race_index {
                None => prop_assert!(races < 4 || !sailed),
                Some(idx) => {
                    prop_assert!(races >= 4 && sailed);
                    let worst = entry.race_scores.iter().copied().fold(f64::MIN, f64::max);
                    let first = entry.race_scores.iter().position(|s| *s == worst);
                    prop_assert_eq!(Some(idx), first);
                }
            }
        }
    }

    /// Property: net total is the sum of the counted races
    #[test]
    fn prop_total_matches_breakdown((entrants, sheet) in class()) {
        for entry in rank(&entrants, &sheet) {
            let gross: f64 = entry.race_scores.iter().sum();
            let dropped = entry.discarded_race_index.map_or(0.0, |i| entry.race_scores[i]);
            prop_assert_eq!(entry.total_points, gross - dropped);
            let counted = races_counted(&entry.race_scores, entry.discarded_race_index);
            prop_assert_eq!(entry.tie_break.len(), counted);
        }
    }

    /// Property: DNC is always roster size + 1, and no non-finish scores more
    #[test]
    fn prop_code_bounds((entrants, sheet) in class()) {
        let fleet = entrants.len() as f64;
        for entry in rank(&entrants, &sheet) {
            for (token, score) in entry.tokens.iter().zip(&entry.race_scores) {
                match token {
                    ScoreToken::Finish(n) => prop_assert_eq!(*score, *n),
                    ScoreToken::Absent => prop_assert_eq!(*score, 0.0),
                    t if t.is_dnc() => prop_assert_eq!(*score, fleet + 1.0),
                    ScoreToken::Code(StatusCode::Rdg) => prop_assert_eq!(*score, 0.0),
                    _ => prop_assert!(*score >= 1.0 && *score <= fleet + 1.0),
                }
            }
        }
    }
}

fn races_counted(scores: &[f64], discarded: Option<usize>) -> usize {
    scores.len() - usize::from(discarded.is_some())
}

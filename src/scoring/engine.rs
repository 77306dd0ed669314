use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::config::ScoringConfig;
use super::token::{ScoreToken, StatusCode};
use crate::regatta::types::{Entrant, ScoreSheet};

/// One line of a class classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub sailor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sail_number: Option<String>,
    /// Net points after the discard
    pub total_points: f64,
    pub discarded_race_index: Option<usize>,
    /// Resolved points per race, in race order
    pub race_scores: Vec<f64>,
    /// Tokens after padding to the class race count
    pub tokens: Vec<ScoreToken>,
    /// Counted race scores, best first
    pub tie_break: Vec<f64>,
}

impl RankedEntry {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.sailor_id)
    }

    pub fn is_discarded(&self, race: usize) -> bool {
        self.discarded_race_index == Some(race)
    }
}

/// Rank a class with the default scoring configuration.
pub fn rank(entrants: &[Entrant], sheet: &ScoreSheet) -> Vec<RankedEntry> {
    rank_with(entrants, sheet, &ScoringConfig::default())
}

/// Rank a class under the low-point system.
///
/// Every roster entry appears exactly once in the result, in classification
/// order with 1-based ranks. Malformed or missing results never fail: they
/// resolve through the fallback rules in `resolve_token`.
pub fn rank_with(
    entrants: &[Entrant],
    sheet: &ScoreSheet,
    config: &ScoringConfig,
) -> Vec<RankedEntry> {
    if entrants.is_empty() {
        return Vec::new();
    }

    let races = race_count(sheet);
    let rows: Vec<Vec<ScoreToken>> = entrants
        .iter()
        .map(|e| normalize(sheet.get(&e.sailor_id).map(Vec::as_slice), races))
        .collect();

    // Anyone not coded DNC for a race counts as a starter in it
    let starters: Vec<usize> = (0..races)
        .map(|race| rows.iter().filter(|row| !row[race].is_dnc()).count())
        .collect();

    let threshold = config.discard_threshold();
    let mut entries: Vec<RankedEntry> = entrants
        .iter()
        .zip(rows)
        .map(|(entrant, tokens)| {
            let race_scores: Vec<f64> = tokens
                .iter()
                .zip(&starters)
                .map(|(token, &started)| resolve_token(token, entrants.len(), started))
                .collect();
            let discarded_race_index = select_discard(&tokens, &race_scores, threshold);

            let counted: Vec<f64> = race_scores
                .iter()
                .enumerate()
                .filter(|(race, _)| Some(*race) != discarded_race_index)
                .map(|(_, score)| *score)
                .collect();
            let total_points = counted.iter().fold(0.0, |acc, score| acc + score);
            let mut tie_break = counted;
            tie_break.sort_by(f64::total_cmp);

            RankedEntry {
                rank: 0,
                sailor_id: entrant.sailor_id.clone(),
                name: entrant.name.clone(),
                sail_number: entrant.sail_number.clone(),
                total_points,
                discarded_race_index,
                race_scores,
                tokens,
                tie_break,
            }
        })
        .collect();

    // Stable: full ties keep roster order
    entries.sort_by(compare_entries);
    for (idx, entry) in entries.iter_mut().enumerate() {
        entry.rank = idx + 1;
    }
    entries
}

/// Longest token sequence anywhere on the sheet.
pub fn race_count(sheet: &ScoreSheet) -> usize {
    sheet.values().map(Vec::len).max().unwrap_or(0)
}

fn normalize(tokens: Option<&[ScoreToken]>, races: usize) -> Vec<ScoreToken> {
    let mut row = tokens.map(<[ScoreToken]>::to_vec).unwrap_or_default();
    row.resize(races, ScoreToken::Absent);
    row
}

/// Points for one race. `fleet_size` is the roster size, `started` the
/// number of entrants not coded DNC in that race.
pub fn resolve_token(token: &ScoreToken, fleet_size: usize, started: usize) -> f64 {
    match token {
        // + 0.0 folds a recorded "-0" into 0
        ScoreToken::Finish(n) => n + 0.0,
        ScoreToken::Code(StatusCode::Dnc) => (fleet_size + 1) as f64,
        ScoreToken::Code(StatusCode::Rdg) => 0.0,
        ScoreToken::Code(_) | ScoreToken::Unknown(_) => (started + 1) as f64,
        ScoreToken::Absent => 0.0,
    }
}

/// Index of the single worst race, first one on ties. Eligibility counts
/// every slot of the padded sequence; a sequence with nothing recorded has
/// nothing to discard.
fn select_discard(tokens: &[ScoreToken], scores: &[f64], threshold: usize) -> Option<usize> {
    if scores.len() < threshold || tokens.iter().all(ScoreToken::is_absent) {
        return None;
    }
    let mut worst = 0;
    for (race, score) in scores.iter().enumerate().skip(1) {
        if score.total_cmp(&scores[worst]) == Ordering::Greater {
            worst = race;
        }
    }
    Some(worst)
}

/// Classification order: net points, then tie-break vectors.
pub fn compare_entries(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    a.total_points
        .total_cmp(&b.total_points)
        .then_with(|| compare_tie_break(&a.tie_break, &b.tie_break))
}

/// Element-wise comparison of ascending score vectors. A vector that runs
/// out is read as 0 from there on.
pub fn compare_tie_break(a: &[f64], b: &[f64]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0.0);
            let y = b.get(i).copied().unwrap_or(0.0);
            x.total_cmp(&y)
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

use std::collections::{BTreeMap, HashSet};

use super::config::ScoringConfig;
use super::token::ScoreToken;
use crate::regatta::types::RaceClass;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(threshold) = config.discard_threshold {
        if threshold < 2 {
            errors.push(format!(
                "scoring.discard_threshold: must be at least 2, got {}",
                threshold
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Strict check of a class before publishing. Ranking itself accepts
/// anything; this reports what it would have had to guess about.
pub fn validate_class(class: &RaceClass) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let prefix = &class.name;

    let mut roster = HashSet::new();
    for entrant in &class.entrants {
        if !roster.insert(entrant.sailor_id.as_str()) {
            errors.push(format!(
                "{}: duplicate entrant '{}'",
                prefix, entrant.sailor_id
            ));
        }
    }

    // race index -> positions already taken, with who took them
    let mut positions: BTreeMap<usize, Vec<(f64, &str)>> = BTreeMap::new();

    for (sailor, tokens) in &class.results {
        if !roster.contains(sailor.as_str()) {
            errors.push(format!(
                "{}: results recorded for '{}' who is not entered",
                prefix, sailor
            ));
        }

        for (race, token) in tokens.iter().enumerate() {
            match token {
                ScoreToken::Unknown(raw) => errors.push(format!(
                    "{}: race {} for '{}': unrecognized result '{}'",
                    prefix,
                    race + 1,
                    sailor,
                    raw
                )),
                ScoreToken::Finish(n) if *n <= 0.0 || n.fract() != 0.0 => {
                    errors.push(format!(
                        "{}: race {} for '{}': finishing position must be a positive whole number, got {}",
                        prefix,
                        race + 1,
                        sailor,
                        token
                    ))
                }
                ScoreToken::Finish(n) => {
                    let seen = positions.entry(race).or_default();
                    if let Some((_, other)) = seen.iter().find(|(pos, _)| pos == n) {
                        errors.push(format!(
                            "{}: race {}: '{}' and '{}' both recorded in position {}",
                            prefix,
                            race + 1,
                            other,
                            sailor,
                            token
                        ));
                    } else {
                        seen.push((*n, sailor.as_str()));
                    }
                }
                _ => {}
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

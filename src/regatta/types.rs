use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scoring::{rank_with, RankedEntry, ScoreToken, ScoringConfig};

/// Raw results for a class: sailor id -> tokens in race order
pub type ScoreSheet = BTreeMap<String, Vec<ScoreToken>>;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Entrant {
    pub sailor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sail_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boat: Option<String>,
}

impl Entrant {
    pub fn new(sailor_id: impl Into<String>) -> Self {
        Self {
            sailor_id: sailor_id.into(),
            name: None,
            sail_number: None,
            boat: None,
        }
    }
}

/// One race class of an event: its roster and the results recorded so far.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RaceClass {
    pub name: String,
    #[serde(default)]
    pub entrants: Vec<Entrant>,
    #[serde(default)]
    pub results: ScoreSheet,
}

impl RaceClass {
    pub fn rank(&self, config: &ScoringConfig) -> Vec<RankedEntry> {
        rank_with(&self.entrants, &self.results, config)
    }
}

/// A regatta results file: one event with any number of classes.
///
/// Example YAML:
/// ```yaml
/// event: Spring Series
/// classes:
///   - name: ILCA 7
///     entrants:
///       - { sailor_id: s1, name: Ann, sail_number: "GBR 7" }
///       - { sailor_id: s2 }
///     results:
///       s1: [1, 2, DNF]
///       s2: [2, 1, 1]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegattaFile {
    pub event: String,
    #[serde(default)]
    pub classes: Vec<RaceClass>,
}

impl RegattaFile {
    /// Find a class by name, ignoring ASCII case
    pub fn class(&self, name: &str) -> Option<&RaceClass> {
        self.classes
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

use serde::{Deserialize, Serialize};

/// Races an entrant's sequence must span before their worst race is discarded.
pub const DEFAULT_DISCARD_THRESHOLD: usize = 4;

/// Scoring configuration.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   discard_threshold: 4
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Minimum number of race slots before one discard is applied (default: 4)
    #[serde(default)]
    pub discard_threshold: Option<usize>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            discard_threshold: Some(DEFAULT_DISCARD_THRESHOLD),
        }
    }
}

impl ScoringConfig {
    pub fn discard_threshold(&self) -> usize {
        self.discard_threshold.unwrap_or(DEFAULT_DISCARD_THRESHOLD)
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::scoring::RankedEntry;

/// The classification of one class at one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassResult {
    pub event: String,
    pub class: String,
    pub entries: Vec<RankedEntry>,
}

/// Where a sailor finished in one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub event: String,
    pub class: String,
    pub rank: usize,
    pub fleet_size: usize,
    pub total_points: f64,
}

/// A sailor's record across every classification tallied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SailorRecord {
    pub sailor_id: String,
    pub name: Option<String>,
    pub starts: usize,
    pub wins: usize,
    pub podiums: usize,
    pub history: Vec<Placement>,
}

impl SailorRecord {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.sailor_id)
    }
}

/// Count wins (rank 1), podiums (rank 3 or better) and starts per sailor.
///
/// Placements come straight from the ranked entries; nothing is rescored.
/// Records are ordered by wins, then podiums, then starts, then first
/// appearance.
pub fn tally(results: &[ClassResult]) -> Vec<SailorRecord> {
    let mut records: Vec<SailorRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for result in results {
        let fleet_size = result.entries.len();
        for entry in &result.entries {
            let slot = *index.entry(entry.sailor_id.clone()).or_insert_with(|| {
                records.push(SailorRecord {
                    sailor_id: entry.sailor_id.clone(),
                    name: None,
                    starts: 0,
                    wins: 0,
                    podiums: 0,
                    history: Vec::new(),
                });
                records.len() - 1
            });

            let record = &mut records[slot];
            if record.name.is_none() {
                record.name = entry.name.clone().filter(|n| !n.is_empty());
            }
            record.starts += 1;
            if entry.rank == 1 {
                record.wins += 1;
            }
            if entry.rank <= 3 {
                record.podiums += 1;
            }
            record.history.push(Placement {
                event: result.event.clone(),
                class: result.class.clone(),
                rank: entry.rank,
                fleet_size,
                total_points: entry.total_points,
            });
        }
    }

    // Stable sort keeps first-appearance order among equals
    records.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(b.podiums.cmp(&a.podiums))
            .then(b.starts.cmp(&a.starts))
    });
    records
}

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::regatta::RegattaFile;
use crate::scoring::ScoringConfig;
use crate::standings::ClassResult;

const PUBLISHED_VERSION: u32 = 1;

/// Official results of an event as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedResults {
    pub version: u32,
    pub event: String,
    pub generated_by: String,
    pub classes: Vec<ClassResult>,
}

impl PublishedResults {
    /// Rank every class of an event.
    pub fn from_regatta(regatta: &RegattaFile, config: &ScoringConfig) -> Self {
        let classes = regatta
            .classes
            .iter()
            .map(|class| ClassResult {
                event: regatta.event.clone(),
                class: class.name.clone(),
                entries: class.rank(config),
            })
            .collect();

        Self {
            version: PUBLISHED_VERSION,
            event: regatta.event.clone(),
            generated_by: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            classes,
        }
    }
}

/// Load published results from a JSON file
///
/// Returns an error if the file cannot be read or has an unsupported version.
pub fn load_published(path: &Path) -> Result<PublishedResults> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open published results at {}", path.display()))?;

    let published: PublishedResults =
        serde_json::from_reader(file).context("Failed to load published results")?;

    if published.version != PUBLISHED_VERSION {
        anyhow::bail!("Unsupported published results version: {}", published.version);
    }

    Ok(published)
}

/// Save published results to a JSON file atomically
///
/// Readers never see a half-written file.
pub fn save_published(path: &Path, published: &PublishedResults) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, published)
        .context("Failed to serialize published results")?;

    file.commit().context("Failed to save published results")?;

    info!(
        event = %published.event,
        classes = published.classes.len(),
        path = %path.display(),
        "published results"
    );
    Ok(())
}

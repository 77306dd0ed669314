use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use super::types::RegattaFile;

/// Load a regatta results file.
///
/// Files ending in `.json` are read as JSON, anything else as YAML.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist or cannot be read
/// - The contents cannot be parsed
pub fn load_regatta(path: &Path) -> Result<RegattaFile> {
    if !path.exists() {
        anyhow::bail!("Results file not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read results file at {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let regatta: RegattaFile = if is_json {
        serde_json::from_str(&content)
            .with_context(|| {
                format!("Failed to parse results: invalid JSON in {}", path.display())
            })?
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| {
                format!("Failed to parse results: invalid YAML in {}", path.display())
            })?
    };

    debug!(
        event = %regatta.event,
        classes = regatta.classes.len(),
        path = %path.display(),
        "loaded results file"
    );

    Ok(regatta)
}

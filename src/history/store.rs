use anyhow::{Context, Result};
use std::path::Path;

use crate::history::HistoryRecord;

/// Load a history record from a JSON file. A missing file is an empty history.
pub fn load_history(path: &Path) -> Result<HistoryRecord> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = ?path, "No history file yet, starting empty");
            return Ok(HistoryRecord::new());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read history file {:?}", path));
        }
    };

    serde_json::from_str::<HistoryRecord>(&data)
        .with_context(|| format!("Failed to parse history file {:?}", path))
}

/// Save a history record as pretty JSON, creating parent directories.
pub fn save_history(path: &Path, history: &HistoryRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
    }

    let json = serde_json::to_string_pretty(history).context("Failed to serialize history")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write history file {:?}", path))?;

    tracing::debug!(path = ?path, results = history.test_results.len(), "Saved history");
    Ok(())
}

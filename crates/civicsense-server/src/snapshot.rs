//! Report snapshots handed to the engine.

use std::path::Path;

use civicsense_core::{Report, Result};
use tracing::debug;

/// Drop reports that are no longer open and sort newest first.
pub fn prepare_for_clustering(reports: Vec<Report>) -> Vec<Report> {
    let total = reports.len();
    let mut open: Vec<Report> = reports.into_iter().filter(|r| r.status.is_open()).collect();
    open.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    debug!("Snapshot: {} of {} reports are open", open.len(), total);
    open
}

/// Read a JSON array of reports from disk.
pub fn load(path: &Path) -> Result<Vec<Report>> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

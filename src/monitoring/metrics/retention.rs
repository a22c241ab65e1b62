//! Per-cycle metric files and their time-based pruning

use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// File name prefix of per-cycle snapshots
pub const METRICS_FILE_PREFIX: &str = "performance-metrics-";

/// Write `value` as `performance-metrics-<timestamp>.json` under `dir`
pub async fn write_snapshot<T: serde::Serialize>(dir: &Path, value: &T) -> Result<PathBuf> {
    let path = dir.join(format!(
        "{}{}.json",
        METRICS_FILE_PREFIX,
        crate::utils::file_timestamp()
    ));
    crate::utils::fs::write_json(&path, value).await?;
    debug!("Wrote metrics snapshot {}", path.display());
    Ok(path)
}

/// Delete snapshot files in `dir` whose mtime is older than `max_age`.
/// Returns the number of files removed; a missing directory removes nothing.
pub async fn prune_older_than(dir: &Path, max_age: Duration) -> Result<usize> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let now = SystemTime::now();
    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with(METRICS_FILE_PREFIX) || !name.ends_with(".json") {
            continue;
        }

        let modified = entry.metadata().await?.modified()?;
        let age = now.duration_since(modified).unwrap_or_default();
        if age <= max_age {
            continue;
        }
        match tokio::fs::remove_file(entry.path()).await {
            Ok(()) => removed += 1,
            Err(e) => warn!("Failed to prune {}: {}", entry.path().display(), e),
        }
    }

    if removed > 0 {
        debug!("Pruned {} metric files from {}", removed, dir.display());
    }
    Ok(removed)
}

//! Filesystem helpers for generated artifacts and reports

use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Write `contents` to `dir/file_name`, first renaming any existing file to
/// `<file_name>.backup.<timestamp>`. Returns the backup path if one was made.
pub async fn write_with_backup(
    dir: &Path,
    file_name: &str,
    contents: &str,
) -> Result<Option<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;
    let target = dir.join(file_name);

    let backup = if tokio::fs::try_exists(&target).await? {
        let backup = dir.join(format!("{}.backup.{}", file_name, super::file_timestamp()));
        tokio::fs::rename(&target, &backup).await?;
        info!("Backed up existing {} to {}", file_name, backup.display());
        Some(backup)
    } else {
        None
    };

    tokio::fs::write(&target, contents).await?;
    debug!("Wrote {} ({} bytes)", target.display(), contents.len());
    Ok(backup)
}

/// Serialize `value` as pretty JSON into `path`, creating parent directories
pub async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let body = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, body).await?;
    Ok(())
}

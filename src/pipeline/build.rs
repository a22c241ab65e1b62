//! Site build step

use crate::config::DeploymentConfig;
use crate::utils::error::{CdnError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info};

/// Result of a successful build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildOutput {
    pub command: String,
    pub output_dir: PathBuf,
    pub files: usize,
    pub duration_ms: u64,
}

/// Output directory resolved against the working directory
pub fn output_dir(config: &DeploymentConfig) -> PathBuf {
    if config.build_dir.is_absolute() {
        config.build_dir.clone()
    } else {
        config.working_dir.join(&config.build_dir)
    }
}

/// Run the build command through the shell in the working directory and
/// require the output directory to exist afterwards
pub async fn run_build(config: &DeploymentConfig) -> Result<BuildOutput> {
    let started = Instant::now();
    info!("Building site: {}", config.build_command);

    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.args(["/C", &config.build_command]);
        c
    } else {
        let mut c = Command::new("sh");
        c.args(["-c", &config.build_command]);
        c
    };
    let output = command
        .current_dir(&config.working_dir)
        .output()
        .await
        .map_err(|e| CdnError::Build(format!("Failed to run '{}': {}", config.build_command, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CdnError::Build(format!(
            "'{}' exited with {}: {}",
            config.build_command,
            output.status,
            crate::utils::truncate_string(stderr.trim(), 500)
        )));
    }
    debug!("Build stdout: {}", String::from_utf8_lossy(&output.stdout).trim());

    let output_dir = output_dir(config);
    if !tokio::fs::try_exists(&output_dir).await? {
        return Err(CdnError::Build(format!(
            "Build output directory {} does not exist",
            output_dir.display()
        )));
    }
    let files = count_files(&output_dir).await?;
    info!("Build finished: {} files in {}", files, output_dir.display());

    Ok(BuildOutput {
        command: config.build_command.clone(),
        output_dir,
        files,
        duration_ms: started.elapsed().as_millis() as u64,
    })
}

async fn count_files(dir: &Path) -> Result<usize> {
    let mut pending = vec![dir.to_path_buf()];
    let mut count = 0;
    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                pending.push(entry.path());
            } else {
                count += 1;
            }
        }
    }
    Ok(count)
}

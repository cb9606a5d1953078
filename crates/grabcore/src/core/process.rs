//! Process execution utilities with timeout support
//!
//! Provides helpers for running external processes (yt-dlp) with configurable
//! timeouts so a hung extractor cannot block a handler forever.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

use crate::core::error::AppError;
use crate::download::error::DownloadError;

/// Run an async Command with a timeout.
///
/// The child is killed when the timeout expires. Returns the process Output
/// on success, or an AppError on timeout/spawn failure.
pub async fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<Output, AppError> {
    cmd.kill_on_drop(true);
    let result = tokio::time::timeout(timeout, cmd.output()).await;
    match result {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(AppError::Download(DownloadError::Process(format!(
            "Failed to run {:?}: {}",
            cmd.as_std().get_program(),
            e
        )))),
        Err(_) => Err(AppError::Download(DownloadError::Timeout(format!(
            "Process timed out after {}s",
            timeout.as_secs()
        )))),
    }
}

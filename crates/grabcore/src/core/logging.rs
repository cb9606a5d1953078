//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A startup dump of the effective configuration

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger was already set
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Token shown in logs: presence and length only.
pub fn describe_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        "not set".to_string()
    } else {
        format!("set ({} chars)", trimmed.chars().count())
    }
}

/// Logs the effective configuration at application startup
pub fn log_startup_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("⚙️  Configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("BOT_TOKEN: {}", describe_token(&config::BOT_TOKEN));
    match config::BOT_API_URL.as_deref() {
        Some(url) => log::info!("BOT_API_URL: {}", url),
        None => log::info!("BOT_API_URL: default (api.telegram.org)"),
    }
    log::info!("DOWNLOAD_FOLDER: {}", config::download_root().display());
    log::info!("YTDL_BIN: {}", config::YTDL_BIN.as_str());
    log::info!(
        "Upload limit: {:.0} MB, document threshold: {:.0} MB",
        *config::delivery::MAX_UPLOAD_BYTES as f64 / (1024.0 * 1024.0),
        config::delivery::DOCUMENT_THRESHOLD_BYTES as f64 / (1024.0 * 1024.0)
    );
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_token_never_leaks_value() {
        assert_eq!(describe_token(""), "not set");
        assert_eq!(describe_token("   "), "not set");
        let shown = describe_token("123456:ABCDEF");
        assert_eq!(shown, "set (13 chars)");
        assert!(!shown.contains("ABCDEF"));
    }
}

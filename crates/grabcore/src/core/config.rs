use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::AppError;

/// Configuration constants for the bot
/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Download folder path
/// Read from DOWNLOAD_FOLDER environment variable
/// Defaults to `downloads` in the working directory
/// Supports tilde (~) expansion for home directory
pub static DOWNLOAD_FOLDER: Lazy<String> =
    Lazy::new(|| env::var("DOWNLOAD_FOLDER").unwrap_or_else(|_| "downloads".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Custom Bot API server URL (local telegram-bot-api)
/// Read from BOT_API_URL environment variable
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| {
    env::var("BOT_API_URL").ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
});

/// Returns the bot token or a validation error when none is configured.
pub fn require_bot_token() -> Result<String, AppError> {
    let token = BOT_TOKEN.trim();
    if token.is_empty() {
        return Err(AppError::Validation(
            "BOT_TOKEN environment variable not set".to_string(),
        ));
    }
    Ok(token.to_string())
}

/// Download root with `~` expanded.
pub fn download_root() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DOWNLOAD_FOLDER.as_str()).to_string())
}

/// Delivery configuration
pub mod delivery {
    use once_cell::sync::Lazy;
    use std::env;

    /// Files strictly larger than this are sent as documents instead of videos (50 MiB)
    pub const DOCUMENT_THRESHOLD_BYTES: u64 = 50 * 1024 * 1024;

    /// Telegram text message limit, counted in UTF-16 code units
    pub const MESSAGE_MAX_UTF16_UNITS: usize = 4096;

    /// Default upload ceiling in MiB (local Bot API server limit)
    pub const DEFAULT_MAX_UPLOAD_MB: u64 = 2000;

    fn parse_upload_limit(raw: Option<&str>) -> u64 {
        raw.and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|mb| *mb > 0)
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB)
            * 1024
            * 1024
    }

    /// Largest file the bot will try to upload, in bytes
    /// Read from MAX_UPLOAD_SIZE_MB environment variable
    pub static MAX_UPLOAD_BYTES: Lazy<u64> =
        Lazy::new(|| parse_upload_limit(env::var("MAX_UPLOAD_SIZE_MB").ok().as_deref()));

}

/// Download configuration
pub mod download {
    use super::Duration;

    /// Timeout for a full yt-dlp download (in seconds)
    pub const YTDLP_TIMEOUT_SECS: u64 = 900; // 15 minutes

    /// Timeout for `yt-dlp --version` (in seconds)
    pub const VERSION_CHECK_TIMEOUT_SECS: u64 = 15;

    /// yt-dlp command timeout duration
    pub fn ytdlp_timeout() -> Duration {
        Duration::from_secs(YTDLP_TIMEOUT_SECS)
    }

    pub fn version_check_timeout() -> Duration {
        Duration::from_secs(VERSION_CHECK_TIMEOUT_SECS)
    }
}

/// Retry configuration
pub mod retry {
    use super::Duration;

    /// Maximum number of retries for dispatcher reconnection
    pub const MAX_DISPATCHER_RETRIES: u32 = 5;

    /// Delay between dispatcher retry attempts (in seconds)
    pub const DISPATCHER_RETRY_DELAY_SECS: u64 = 5;

    /// Dispatcher retry delay duration
    pub fn dispatcher_delay() -> Duration {
        Duration::from_secs(DISPATCHER_RETRY_DELAY_SECS)
    }

    /// Base for exponential backoff calculation
    pub const EXPONENTIAL_BACKOFF_BASE: u64 = 2;

    /// Attempts to reach the Bot API on startup (5s apart)
    pub const STARTUP_MAX_RETRIES: u32 = 60;
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API requests (in seconds)
    /// Large uploads go through the same client
    pub const REQUEST_TIMEOUT_SECS: u64 = 900; // 15 minutes

    /// Whole-request timeout for direct media fetches (in seconds)
    pub const DIRECT_FETCH_TIMEOUT_SECS: u64 = 600;

    /// Connect timeout for direct media fetches (in seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 30;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }

    pub fn direct_fetch_timeout() -> Duration {
        Duration::from_secs(DIRECT_FETCH_TIMEOUT_SECS)
    }

    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }
}

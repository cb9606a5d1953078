use thiserror::Error;

use crate::download::error::DownloadError;

/// Centralized error types for the application
///
/// Every failure on the download/send path is converted to this enum, so the
/// bot can log a category and pick a user-facing message per kind.
///
/// # Example
///
/// ```no_run
/// use grabcore::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("{}: {}", err.category(), err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Telegram API errors
    #[cfg(feature = "telegram")]
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Download/yt-dlp errors
    #[error("{0}")]
    Download(#[from] DownloadError),

    /// HTTP/Fetch errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP status code errors
    #[error("HTTP request failed with status: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is bigger than the Bot API accepts for uploads
    #[error("file is {size} bytes, upload limit is {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Short category name for logs
    pub fn category(&self) -> &'static str {
        match self {
            #[cfg(feature = "telegram")]
            AppError::Telegram(_) => "telegram",
            AppError::Download(err) => err.subcategory(),
            AppError::Http(_) => "network",
            AppError::HttpStatus(_) => "http_status",
            AppError::Io(_) => "io",
            AppError::FileTooLarge { .. } => "file_too_large",
            AppError::Validation(_) => "validation",
        }
    }

    /// Text shown to the user when a request fails.
    ///
    /// Always starts with ❌ and carries the error text.
    pub fn user_message(&self) -> String {
        match self {
            #[cfg(feature = "telegram")]
            AppError::Telegram(_) => format!("❌ Sorry, couldn't send the video: {}", self),
            AppError::FileTooLarge { .. } => format!("❌ Sorry, the video is too large to send: {}", self),
            _ => format!("❌ Sorry, couldn't download the video: {}", self),
        }
    }
}

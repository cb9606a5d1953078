use std::fmt;

/// Structured error type for download operations.
///
/// Each variant carries the text that ends up in front of the user, so the
/// message from yt-dlp reaches the chat unchanged.
#[derive(Debug)]
pub enum DownloadError {
    /// yt-dlp specific failures (bad exit code, unsupported site, unreadable output)
    YtDlp(String),
    /// Expected file not found after the download finished
    FileNotFound(String),
    /// Download timed out
    Timeout(String),
    /// Process execution failure (spawn, wait)
    Process(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for DownloadError {}

impl DownloadError {
    /// Returns subcategory for logs
    pub fn subcategory(&self) -> &'static str {
        match self {
            DownloadError::YtDlp(_) => "ytdlp",
            DownloadError::FileNotFound(_) => "file_not_found",
            DownloadError::Timeout(_) => "timeout",
            DownloadError::Process(_) => "process",
        }
    }

    /// Returns the inner message
    pub fn message(&self) -> &str {
        match self {
            DownloadError::YtDlp(msg)
            | DownloadError::FileNotFound(msg)
            | DownloadError::Timeout(msg)
            | DownloadError::Process(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_display() {
        let err = DownloadError::YtDlp("yt-dlp failed".into());
        assert_eq!(err.to_string(), "yt-dlp failed");
    }

    #[test]
    fn test_download_error_subcategory() {
        assert_eq!(DownloadError::YtDlp("".into()).subcategory(), "ytdlp");
        assert_eq!(DownloadError::FileNotFound("".into()).subcategory(), "file_not_found");
        assert_eq!(DownloadError::Timeout("".into()).subcategory(), "timeout");
        assert_eq!(DownloadError::Process("".into()).subcategory(), "process");
    }
}

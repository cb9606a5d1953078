//! yt-dlp stderr analysis
//!
//! Classifies a failed yt-dlp run for logs and pulls out the line worth
//! showing to the user.

/// Types of yt-dlp failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YtDlpErrorType {
    /// No extractor for the URL
    UnsupportedUrl,
    /// Video is private, removed, geo-blocked or needs login
    VideoUnavailable,
    /// Network problems (timeouts, connection resets, DNS)
    NetworkError,
    /// ffmpeg merge / post-processing failed
    PostprocessingError,
    /// Anything else
    Unknown,
}

impl YtDlpErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            YtDlpErrorType::UnsupportedUrl => "unsupported_url",
            YtDlpErrorType::VideoUnavailable => "video_unavailable",
            YtDlpErrorType::NetworkError => "network",
            YtDlpErrorType::PostprocessingError => "postprocessing",
            YtDlpErrorType::Unknown => "unknown",
        }
    }
}

/// Analyzes yt-dlp stderr and determines the error type
pub fn analyze_ytdlp_error(stderr: &str) -> YtDlpErrorType {
    let stderr_lower = stderr.to_lowercase();

    if stderr_lower.contains("unsupported url") || stderr_lower.contains("is not a valid url") {
        return YtDlpErrorType::UnsupportedUrl;
    }

    if stderr_lower.contains("private video")
        || stderr_lower.contains("video unavailable")
        || stderr_lower.contains("this video is not available")
        || stderr_lower.contains("video has been removed")
        || stderr_lower.contains("login required")
        || stderr_lower.contains("requested content is not available")
    {
        return YtDlpErrorType::VideoUnavailable;
    }

    if stderr_lower.contains("postprocessing") || stderr_lower.contains("ffmpeg") {
        return YtDlpErrorType::PostprocessingError;
    }

    if stderr_lower.contains("timed out")
        || stderr_lower.contains("connection")
        || stderr_lower.contains("network")
        || stderr_lower.contains("name resolution")
        || stderr_lower.contains("failed to connect")
    {
        return YtDlpErrorType::NetworkError;
    }

    YtDlpErrorType::Unknown
}

/// Picks the message to surface from yt-dlp stderr.
///
/// Prefers the last `ERROR:` line; falls back to the last non-empty line.
pub fn user_facing_error(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
        .unwrap_or_else(|| "yt-dlp exited without an error message".to_string())
}

//! Delivery rules: which Telegram send to use for a file, and the caption
//! message that follows extracted media.

use crate::core::config;
use crate::core::error::AppError;
use crate::download::route::Route;
use crate::download::source::MediaInfo;

/// Notice sent before a document upload of extracted media
pub const LARGE_FILE_NOTICE: &str = "📤 File is large, sending as document to preserve quality...";

/// Notice sent before a document upload of a directly fetched file
pub const DIRECT_LARGE_FILE_NOTICE: &str = "📤 File is large, sending as document...";

/// Notice for the route whose source produced the file.
pub fn large_file_notice(served_by: Route) -> &'static str {
    match served_by {
        Route::Direct => DIRECT_LARGE_FILE_NOTICE,
        Route::Delegated => LARGE_FILE_NOTICE,
    }
}

/// Title used when the extractor reports none
pub const DEFAULT_TITLE: &str = "Video";

/// How a downloaded file is delivered to the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Streaming-capable video message
    Video,
    /// Generic document attachment (no recompression, no inline player)
    Document,
}

impl DeliveryMode {
    /// Picks the send for a file of `size_bytes`.
    ///
    /// Strictly above the threshold goes out as a document.
    pub fn for_size(size_bytes: u64) -> Self {
        Self::for_size_with_threshold(size_bytes, config::delivery::DOCUMENT_THRESHOLD_BYTES)
    }

    pub fn for_size_with_threshold(size_bytes: u64, threshold: u64) -> Self {
        if size_bytes > threshold {
            DeliveryMode::Document
        } else {
            DeliveryMode::Video
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMode::Video => "video",
            DeliveryMode::Document => "document",
        }
    }
}

/// Refuses files above the upload ceiling before any send is attempted.
pub fn check_upload_limit(size_bytes: u64, limit: u64) -> Result<(), AppError> {
    if size_bytes > limit {
        return Err(AppError::FileTooLarge {
            size: size_bytes,
            limit,
        });
    }
    Ok(())
}

/// Builds the follow-up caption: title, then uploader and description when present.
pub fn compose_caption(info: &MediaInfo) -> String {
    let title = info
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE);

    let mut caption = format!("🎥 {}\n\n", title);

    if let Some(uploader) = info.uploader.as_deref().filter(|u| !u.trim().is_empty()) {
        caption.push_str(&format!("👤 {}\n\n", uploader));
    }

    if let Some(description) = info.description.as_deref().filter(|d| !d.trim().is_empty()) {
        caption.push_str(description);
    }

    truncate_utf16(&caption, config::delivery::MESSAGE_MAX_UTF16_UNITS)
}

/// Cuts `text` to at most `max_units` UTF-16 code units (Telegram's length
/// measure), ending with `…` when shortened. Never splits a character.
pub fn truncate_utf16(text: &str, max_units: usize) -> String {
    if text.encode_utf16().count() <= max_units {
        return text.to_string();
    }
    let budget = max_units.saturating_sub('…'.len_utf16());
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        used += c.len_utf16();
        if used > budget {
            break;
        }
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(DeliveryMode::for_size(0), DeliveryMode::Video);
        assert_eq!(DeliveryMode::for_size(50 * MIB), DeliveryMode::Video);
        assert_eq!(DeliveryMode::for_size(50 * MIB + 1), DeliveryMode::Document);
        assert_eq!(DeliveryMode::for_size(700 * MIB), DeliveryMode::Document);
    }

    #[test]
    fn test_upload_limit() {
        assert!(check_upload_limit(100, 100).is_ok());
        let err = check_upload_limit(101, 100).unwrap_err();
        assert!(matches!(err, AppError::FileTooLarge { size: 101, limit: 100 }));
    }

    #[test]
    fn test_full_caption() {
        let info = MediaInfo {
            title: Some("Cat video".to_string()),
            uploader: Some("Alice".to_string()),
            description: Some("A cat.\nAnother line".to_string()),
        };
        assert_eq!(compose_caption(&info), "🎥 Cat video\n\n👤 Alice\n\nA cat.\nAnother line");
    }

    #[test]
    fn test_caption_skips_missing_fields() {
        let info = MediaInfo {
            title: Some("Only title".to_string()),
            uploader: Some(String::new()),
            description: None,
        };
        assert_eq!(compose_caption(&info), "🎥 Only title\n\n");
    }

    #[test]
    fn test_caption_default_title() {
        let info = MediaInfo::default();
        assert_eq!(compose_caption(&info), "🎥 Video\n\n");
    }

    #[test]
    fn test_caption_is_truncated_to_message_limit() {
        let info = MediaInfo {
            title: Some("Long".to_string()),
            uploader: None,
            description: Some("ж".repeat(10_000)),
        };
        let caption = compose_caption(&info);
        assert_eq!(caption.encode_utf16().count(), config::delivery::MESSAGE_MAX_UTF16_UNITS);
        assert!(caption.ends_with('…'));
    }

    #[test]
    fn test_emoji_caption_fits_in_utf16_units() {
        let info = MediaInfo {
            title: Some("Party".to_string()),
            uploader: None,
            description: Some("😀".repeat(3000)),
        };
        let caption = compose_caption(&info);
        assert!(caption.chars().count() < config::delivery::MESSAGE_MAX_UTF16_UNITS);
        assert!(caption.encode_utf16().count() <= config::delivery::MESSAGE_MAX_UTF16_UNITS);
        assert!(caption.ends_with("😀…"));
    }

    #[test]
    fn test_truncate_utf16() {
        assert_eq!(truncate_utf16("abc", 3), "abc");
        assert_eq!(truncate_utf16("abcd", 3), "ab…");
        // each emoji is two units; half of one never survives
        assert_eq!(truncate_utf16("😀😀😀", 4), "😀…");
        assert_eq!(truncate_utf16("😀😀", 4), "😀😀");
    }

    #[test]
    fn test_large_file_notice_by_route() {
        assert_eq!(large_file_notice(Route::Direct), DIRECT_LARGE_FILE_NOTICE);
        assert_eq!(large_file_notice(Route::Delegated), LARGE_FILE_NOTICE);
    }
}

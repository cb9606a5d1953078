//! URL classification: decides whether a message is fetched directly or
//! handed to yt-dlp.
//!
//! Classification is substring-based and does no URL validation; malformed
//! input is only rejected later by the HTTP client or the extractor.

/// Instagram domain marker. Also matches `cdninstagram.com`.
pub const INSTAGRAM_MARKER: &str = "instagram.com";

/// Instagram CDN marker (`scontent-*.cdninstagram.com`)
pub const CDN_MARKER: &str = "scontent";

/// Handling path for an incoming message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The text already points at the raw media file
    Direct,
    /// The text is a page URL that yt-dlp must resolve
    Delegated,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Direct => "direct",
            Route::Delegated => "delegated",
        }
    }
}

/// Classifies raw message text.
///
/// `Route::Direct` only when the text contains both the Instagram domain
/// marker and the CDN marker; everything else is delegated.
pub fn classify(text: &str) -> Route {
    if text.contains(INSTAGRAM_MARKER) && text.contains(CDN_MARKER) {
        Route::Direct
    } else {
        Route::Delegated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instagram_cdn_link_is_direct() {
        assert_eq!(classify("https://scontent.cdninstagram.com/xyz.mp4"), Route::Direct);
        assert_eq!(
            classify("https://scontent-ams2-1.cdninstagram.com/v/t50.2886-16/clip.mp4?efg=abc"),
            Route::Direct
        );
    }

    #[test]
    fn test_regular_pages_are_delegated() {
        assert_eq!(classify("https://www.youtube.com/watch?v=abc"), Route::Delegated);
        assert_eq!(classify("https://www.instagram.com/reel/Cxyz/"), Route::Delegated);
        assert_eq!(classify("https://x.com/user/status/1"), Route::Delegated);
        assert_eq!(classify("https://cdn.example.com/scontent/video.mp4"), Route::Delegated);
    }

    #[test]
    fn test_no_validation_is_performed() {
        // Both markers in garbage text still route directly
        assert_eq!(classify("scontent instagram.com not a url"), Route::Direct);
        assert_eq!(classify(""), Route::Delegated);
        assert_eq!(classify("hello"), Route::Delegated);
    }

    #[test]
    fn test_route_names() {
        assert_eq!(Route::Direct.as_str(), "direct");
        assert_eq!(Route::Delegated.as_str(), "delegated");
    }
}

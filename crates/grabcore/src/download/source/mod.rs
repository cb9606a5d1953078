//! Download source abstraction layer.
//!
//! Provides the `DownloadSource` trait for pluggable download backends and a
//! `SourceRegistry` that maps a [`Route`] to the backend handling it.
//!
//! Built-in backends:
//! - `HttpSource`: direct media URLs (Instagram CDN links), streamed to disk
//! - `YtDlpSource`: page URLs on any site yt-dlp understands

pub mod http;
pub mod ytdlp;

use crate::core::error::AppError;
use crate::download::route::Route;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Request parameters for a download operation.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Raw message text; not validated as a URL
    pub url: String,
    /// Per-request directory the file must be written into
    pub workdir: PathBuf,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            workdir: workdir.into(),
        }
    }
}

/// Descriptive metadata reported by the extractor, used verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaInfo {
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub description: Option<String>,
}

/// Output from a successful download operation.
#[derive(Debug, Clone)]
pub struct DownloadOutput {
    /// Actual path of the saved file
    pub file_path: PathBuf,
    /// File size in bytes
    pub file_size: u64,
    /// Extractor metadata; `None` for direct fetches
    pub info: Option<MediaInfo>,
}

/// Trait for download source implementations.
#[async_trait]
pub trait DownloadSource: Send + Sync {
    /// Human-readable name of this source (e.g., "yt-dlp", "http")
    fn name(&self) -> &str;

    /// Saves the media behind `request.url` into `request.workdir`.
    async fn download(&self, request: &DownloadRequest) -> Result<DownloadOutput, AppError>;
}

/// Registry that routes classified messages to the appropriate download source.
pub struct SourceRegistry {
    direct: Arc<dyn DownloadSource>,
    delegated: Arc<dyn DownloadSource>,
}

impl SourceRegistry {
    pub fn new(direct: Arc<dyn DownloadSource>, delegated: Arc<dyn DownloadSource>) -> Self {
        Self { direct, delegated }
    }

    /// Source handling the given route.
    pub fn resolve(&self, route: Route) -> Arc<dyn DownloadSource> {
        match route {
            Route::Direct => Arc::clone(&self.direct),
            Route::Delegated => Arc::clone(&self.delegated),
        }
    }

    /// The extractor-backed source, also used when a direct fetch is refused.
    pub fn delegated(&self) -> Arc<dyn DownloadSource> {
        Arc::clone(&self.delegated)
    }

    /// Create the default registry with built-in sources.
    pub fn default_registry() -> Result<Self, AppError> {
        Ok(Self::new(
            Arc::new(http::HttpSource::new()?),
            Arc::new(ytdlp::YtDlpSource::new()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_resolve() {
        let registry = SourceRegistry::default_registry().unwrap();
        assert_eq!(registry.resolve(Route::Direct).name(), "http");
        assert_eq!(registry.resolve(Route::Delegated).name(), "yt-dlp");
        assert_eq!(registry.delegated().name(), "yt-dlp");
    }
}

//! HttpSource: direct HTTP download of a URL that already points at media.
//!
//! Plain streaming GET: no custom headers, no auth, no retry. The body is
//! only written when the server answers with a success status; any other
//! status is returned as `AppError::HttpStatus` with nothing on disk.

use crate::core::config;
use crate::core::error::AppError;
use crate::download::source::{DownloadOutput, DownloadRequest, DownloadSource};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use url::Url;

/// File name used when the URL has no usable last path segment
pub const FALLBACK_FILE_NAME: &str = "video.mp4";

const MAX_FILE_NAME_CHARS: usize = 120;

/// Download source for direct HTTP file downloads.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config::network::direct_fetch_timeout())
            .connect_timeout(config::network::connect_timeout())
            .build()?;

        Ok(Self { client })
    }

    /// Local file name for `url`: its decoded last path segment when that looks
    /// like a file, otherwise [`FALLBACK_FILE_NAME`].
    pub fn file_name_for(url: &str) -> String {
        Url::parse(url)
            .ok()
            .and_then(|parsed| {
                parsed
                    .path_segments()
                    .and_then(|mut segments| segments.next_back().map(|s| s.to_string()))
            })
            .map(|segment| urlencoding::decode(&segment).map(|s| s.into_owned()).unwrap_or(segment))
            .map(|name| sanitize_file_name(&name))
            .filter(|name| is_usable_file_name(name))
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
    }
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .take(MAX_FILE_NAME_CHARS)
        .collect()
}

fn is_usable_file_name(name: &str) -> bool {
    !name.starts_with('.')
        && name
            .rsplit_once('.')
            .map(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
            .unwrap_or(false)
}

#[async_trait]
impl DownloadSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn download(&self, request: &DownloadRequest) -> Result<DownloadOutput, AppError> {
        log::info!("📥 HTTP direct download: {}", request.url);

        let response = self.client.get(request.url.as_str()).send().await?;

        if !response.status().is_success() {
            log::warn!("HTTP {} for {}", response.status(), request.url);
            return Err(AppError::HttpStatus(response.status()));
        }

        let file_path = request.workdir.join(Self::file_name_for(&request.url));
        let mut file = tokio::fs::File::create(&file_path).await?;

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
        }
        file.flush().await?;
        drop(file);

        let file_size = tokio::fs::metadata(&file_path)
            .await
            .map(|m| m.len())
            .unwrap_or(downloaded);

        log::info!(
            "✅ HTTP download complete: {} ({:.2} MB)",
            file_path.display(),
            file_size as f64 / (1024.0 * 1024.0)
        );

        Ok(DownloadOutput {
            file_path,
            file_size,
            info: None,
        })
    }
}

//! Per-message workflow: classify, download, deliver, clean up.
//!
//! One call handles one incoming text message end to end. Everything the
//! request writes lives in its own [`TempWorkspace`], which is removed before
//! the call returns whether delivery succeeded or not.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use grabcore::config;
use grabcore::download::delivery::{check_upload_limit, compose_caption, large_file_notice, DeliveryMode};
use grabcore::download::source::{DownloadOutput, DownloadRequest};
use grabcore::{classify, AppError, Route, SourceRegistry, TempWorkspace};
use teloxide::types::ChatId;

use crate::telegram::sender::MediaSender;

/// Acknowledgement sent as soon as a link arrives
pub const PROCESSING_NOTICE: &str = "📥 Processing your request...";

/// What was delivered for one request. Logged, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub mode: DeliveryMode,
    pub caption_sent: bool,
    pub file_size: u64,
}

/// Download-and-deliver pipeline shared by all handler invocations.
pub struct Pipeline {
    registry: Arc<SourceRegistry>,
    download_root: PathBuf,
    upload_limit: u64,
}

impl Pipeline {
    pub fn new(registry: Arc<SourceRegistry>, download_root: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            download_root: download_root.into(),
            upload_limit: *config::delivery::MAX_UPLOAD_BYTES,
        }
    }

    /// Overrides the upload ceiling (bytes).
    pub fn with_upload_limit(mut self, limit: u64) -> Self {
        self.upload_limit = limit;
        self
    }

    pub fn download_root(&self) -> &Path {
        &self.download_root
    }

    /// Downloads `url` into `workdir` through the source its route selects.
    ///
    /// A direct fetch that gets a non-success status is retried once through
    /// the delegated source. Returns the route whose source produced the file.
    pub async fn fetch(&self, url: &str, workdir: &Path) -> Result<(Route, DownloadOutput), AppError> {
        let route = classify(url);
        let source = self.registry.resolve(route);
        let request = DownloadRequest::new(url, workdir);

        log::info!("🔀 Route {} via {} for {}", route.as_str(), source.name(), url);

        match source.download(&request).await {
            Err(AppError::HttpStatus(status)) if route == Route::Direct => {
                let fallback = self.registry.delegated();
                log::warn!(
                    "Direct fetch returned {} for {}, retrying with {}",
                    status,
                    url,
                    fallback.name()
                );
                let output = fallback.download(&request).await?;
                Ok((Route::Delegated, output))
            }
            result => result.map(|output| (route, output)),
        }
    }

    /// Downloads `url` and sends it to `chat_id`.
    ///
    /// Errors are returned to the caller; the workspace is gone either way.
    pub async fn deliver(&self, sender: &dyn MediaSender, chat_id: ChatId, url: &str) -> Result<DeliveryOutcome, AppError> {
        let workspace = TempWorkspace::create(&self.download_root).await?;
        let (served_by, output) = self.fetch(url, workspace.path()).await?;

        let file_size = tokio::fs::metadata(&output.file_path).await?.len();
        check_upload_limit(file_size, self.upload_limit)?;

        let mode = DeliveryMode::for_size(file_size);
        log::info!(
            "📤 Sending {} as {} ({:.2} MB) to chat {}",
            output.file_path.display(),
            mode.as_str(),
            file_size as f64 / (1024.0 * 1024.0),
            chat_id
        );

        match mode {
            DeliveryMode::Document => {
                if let Err(e) = sender.send_text(chat_id, large_file_notice(served_by)).await {
                    log::warn!("Failed to send large file notice to chat {}: {}", chat_id, e);
                }
                sender.upload_document(chat_id, &output.file_path).await?;
            }
            DeliveryMode::Video => sender.upload_video(chat_id, &output.file_path).await?,
        }

        let caption_sent = match &output.info {
            Some(info) => {
                sender.send_caption(chat_id, &compose_caption(info)).await?;
                true
            }
            None => false,
        };

        if let Err(e) = workspace.cleanup().await {
            log::warn!("Failed to clean up after chat {}: {}", chat_id, e);
        }

        Ok(DeliveryOutcome {
            mode,
            caption_sent,
            file_size,
        })
    }

    /// Handles one text message: acknowledge, deliver, and report a failure
    /// with exactly one `❌` reply.
    ///
    /// Returns `None` when the request failed.
    pub async fn process_message(
        &self,
        sender: &dyn MediaSender,
        chat_id: ChatId,
        text: &str,
    ) -> Option<DeliveryOutcome> {
        let url = text.trim();
        log::info!("📨 Chat {} sent: {}", chat_id, url);

        if let Err(e) = sender.send_text(chat_id, PROCESSING_NOTICE).await {
            log::warn!("Failed to acknowledge chat {}: {}", chat_id, e);
        }

        match self.deliver(sender, chat_id, url).await {
            Ok(outcome) => {
                log::info!(
                    "✅ Delivered to chat {}: mode={}, caption={}, size={}",
                    chat_id,
                    outcome.mode.as_str(),
                    outcome.caption_sent,
                    outcome.file_size
                );
                Some(outcome)
            }
            Err(e) => {
                log::error!("❌ Request from chat {} failed [{}]: {}", chat_id, e.category(), e);
                if let Err(send_err) = sender.send_text(chat_id, &e.user_message()).await {
                    log::error!("Failed to report error to chat {}: {}", chat_id, send_err);
                }
                None
            }
        }
    }
}

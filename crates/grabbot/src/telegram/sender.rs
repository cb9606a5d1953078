//! Outgoing side of the bot: the four kinds of message a request can produce.
//!
//! The pipeline talks to [`MediaSender`] instead of `Bot` directly, so the
//! whole download-and-deliver flow runs in tests against a recorder.

use std::path::Path;

use async_trait::async_trait;
use grabcore::AppError;
use teloxide::prelude::*;
use teloxide::types::{InputFile, LinkPreviewOptions};

#[async_trait]
pub trait MediaSender: Send + Sync {
    /// Plain text reply (acknowledgement, notices, errors)
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), AppError>;

    /// Caption message that follows extracted media; link previews disabled
    async fn send_caption(&self, chat_id: ChatId, text: &str) -> Result<(), AppError>;

    /// Streaming-capable video upload
    async fn upload_video(&self, chat_id: ChatId, path: &Path) -> Result<(), AppError>;

    /// Document upload, sent without recompression
    async fn upload_document(&self, chat_id: ChatId, path: &Path) -> Result<(), AppError>;
}

fn previews_disabled() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

#[async_trait]
impl MediaSender for Bot {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), AppError> {
        self.send_message(chat_id, text.to_string()).await?;
        Ok(())
    }

    async fn send_caption(&self, chat_id: ChatId, text: &str) -> Result<(), AppError> {
        self.send_message(chat_id, text.to_string())
            .link_preview_options(previews_disabled())
            .await?;
        Ok(())
    }

    async fn upload_video(&self, chat_id: ChatId, path: &Path) -> Result<(), AppError> {
        self.send_video(chat_id, InputFile::file(path.to_path_buf()))
            .supports_streaming(true)
            .await?;
        Ok(())
    }

    async fn upload_document(&self, chat_id: ChatId, path: &Path) -> Result<(), AppError> {
        self.send_document(chat_id, InputFile::file(path.to_path_buf())).await?;
        Ok(())
    }
}

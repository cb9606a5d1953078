//! Shared test doubles: a sender that records every outgoing message and
//! scripted download sources.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use grabbot::telegram::MediaSender;
use grabcore::download::source::{DownloadOutput, DownloadRequest, DownloadSource, MediaInfo};
use grabcore::{AppError, SourceRegistry};
use teloxide::types::ChatId;

pub const CHAT: ChatId = ChatId(123456789);
pub const MIB: u64 = 1024 * 1024;

/// One outgoing message as the chat would see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text(String),
    Caption(String),
    /// File name and size at the moment of upload
    Video(String, u64),
    Document(String, u64),
}

#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<Sent>>,
    reject_uploads: bool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sender whose video/document uploads fail like a refused Bot API call.
    pub fn rejecting_uploads() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reject_uploads: true,
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn error_replies(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text(text) if text.starts_with('❌') => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn uploads(&self) -> usize {
        self.sent()
            .iter()
            .filter(|s| matches!(s, Sent::Video(..) | Sent::Document(..)))
            .count()
    }

    fn record_upload(&self, path: &Path, make: fn(String, u64) -> Sent) -> Result<(), AppError> {
        if self.reject_uploads {
            return Err(AppError::Validation("upload rejected".to_string()));
        }
        let size = std::fs::metadata(path)?.len();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        self.sent.lock().unwrap().push(make(name, size));
        Ok(())
    }
}

#[async_trait]
impl MediaSender for RecordingSender {
    async fn send_text(&self, _chat_id: ChatId, text: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(Sent::Text(text.to_string()));
        Ok(())
    }

    async fn send_caption(&self, _chat_id: ChatId, text: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(Sent::Caption(text.to_string()));
        Ok(())
    }

    async fn upload_video(&self, _chat_id: ChatId, path: &Path) -> Result<(), AppError> {
        self.record_upload(path, Sent::Video)
    }

    async fn upload_document(&self, _chat_id: ChatId, path: &Path) -> Result<(), AppError> {
        self.record_upload(path, Sent::Document)
    }
}

/// What a [`FakeSource`] does when asked to download.
#[derive(Clone)]
pub enum Script {
    /// Writes a (sparse) file of `size` bytes into the workdir
    Write {
        file_name: String,
        size: u64,
        info: Option<MediaInfo>,
    },
    /// Answers like a server refusing the request
    Status(u16),
    /// Fails like yt-dlp rejecting the link
    YtDlpError(String),
    /// Fails with an IO error
    Io(String),
}

pub struct FakeSource {
    name: String,
    script: Script,
    calls: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeSource {
    pub fn new(name: &str, script: Script) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            script,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn writing(name: &str, file_name: &str, size: u64, info: Option<MediaInfo>) -> Arc<Self> {
        Self::new(
            name,
            Script::Write {
                file_name: file_name.to_string(),
                size,
                info,
            },
        )
    }

    /// URLs this source was asked for, in order
    pub fn urls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(url, _)| url.clone()).collect()
    }

    pub fn workdirs(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().iter().map(|(_, dir)| dir.clone()).collect()
    }
}

#[async_trait]
impl DownloadSource for FakeSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn download(&self, request: &DownloadRequest) -> Result<DownloadOutput, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.url.clone(), request.workdir.clone()));

        match &self.script {
            Script::Write { file_name, size, info } => {
                let file_path = request.workdir.join(file_name);
                let file = std::fs::File::create(&file_path)?;
                file.set_len(*size)?;
                Ok(DownloadOutput {
                    file_path,
                    file_size: *size,
                    info: info.clone(),
                })
            }
            Script::Status(code) => Err(AppError::HttpStatus(reqwest::StatusCode::from_u16(*code).unwrap())),
            Script::YtDlpError(text) => Err(AppError::Download(grabcore::download::DownloadError::YtDlp(
                text.clone(),
            ))),
            Script::Io(text) => Err(AppError::Io(std::io::Error::other(text.clone()))),
        }
    }
}

pub fn registry(direct: Arc<FakeSource>, delegated: Arc<FakeSource>) -> Arc<SourceRegistry> {
    Arc::new(SourceRegistry::new(direct, delegated))
}

pub fn cat_video_info() -> MediaInfo {
    MediaInfo {
        title: Some("Cat video".to_string()),
        uploader: Some("Alice".to_string()),
        description: Some("A cat.".to_string()),
    }
}

/// Entries left under the download root
pub fn leftovers(root: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(root)
        .map(|entries| entries.map(|e| e.unwrap().path()).collect())
        .unwrap_or_default()
}

//! YtDlpSource: extraction backend powered by the yt-dlp executable.
//!
//! yt-dlp resolves the page, picks an mp4-friendly format, merges audio and
//! video with ffmpeg when needed, and writes `<workdir>/<id>.<ext>`. Its info
//! JSON is read from stdout in the same run, so title, uploader and
//! description come from exactly the file that was saved.

use crate::core::config;
use crate::core::error::AppError;
use crate::core::process::run_with_timeout;
use crate::download::error::DownloadError;
use crate::download::source::{DownloadOutput, DownloadRequest, DownloadSource, MediaInfo};
use crate::download::ytdlp_errors::{analyze_ytdlp_error, user_facing_error};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Prefer a single mp4, then mp4 video + m4a audio, then whatever is best
pub const FORMAT_SELECTOR: &str = "best[ext=mp4]/bestvideo[ext=mp4]+bestaudio[ext=m4a]/best";

/// Container used when audio and video are merged
pub const MERGE_OUTPUT_FORMAT: &str = "mp4";

/// Output template, relative to the request workdir
pub const OUTPUT_TEMPLATE: &str = "%(id)s.%(ext)s";

/// Lets the Instagram extractor hand out direct media links
pub const EXTRACTOR_ARGS: &str = "instagram:direct=true";

/// Subset of the yt-dlp info JSON the bot needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YtDlpInfo {
    #[serde(default)]
    pub id: String,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub description: Option<String>,
    pub ext: Option<String>,
    pub filename: Option<String>,
    #[serde(rename = "_filename")]
    pub legacy_filename: Option<String>,
}

impl YtDlpInfo {
    pub fn media_info(&self) -> MediaInfo {
        MediaInfo {
            title: self.title.clone(),
            uploader: self.uploader.clone(),
            description: self.description.clone(),
        }
    }
}

/// Download source powered by yt-dlp for extracting media from supported sites.
pub struct YtDlpSource {
    bin: String,
    timeout: Duration,
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlpSource {
    /// Source using `YTDL_BIN` and the configured download timeout.
    pub fn new() -> Self {
        Self::with_binary(config::YTDL_BIN.as_str())
    }

    pub fn with_binary(bin: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            timeout: config::download::ytdlp_timeout(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.bin
    }

    /// Builds the yt-dlp argument list for one download.
    ///
    /// The URL goes after `--` so message text can never be read as an option.
    pub fn build_args(url: &str, workdir: &Path) -> Vec<String> {
        let template = workdir.join(OUTPUT_TEMPLATE);
        vec![
            "--no-playlist".to_string(),
            "--format".to_string(),
            FORMAT_SELECTOR.to_string(),
            "--merge-output-format".to_string(),
            MERGE_OUTPUT_FORMAT.to_string(),
            "--keep-video".to_string(),
            "--extractor-args".to_string(),
            EXTRACTOR_ARGS.to_string(),
            "--no-warnings".to_string(),
            "--no-progress".to_string(),
            "--no-simulate".to_string(),
            "--dump-json".to_string(),
            "--output".to_string(),
            template.to_string_lossy().to_string(),
            "--".to_string(),
            url.to_string(),
        ]
    }

    /// Returns `yt-dlp --version` output.
    pub async fn check_version(&self) -> Result<String, AppError> {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("--version").stdin(Stdio::null());
        let output = run_with_timeout(&mut cmd, config::download::version_check_timeout()).await?;
        if !output.status.success() {
            return Err(AppError::Download(DownloadError::YtDlp(user_facing_error(
                &String::from_utf8_lossy(&output.stderr),
            ))));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Parses the info JSON yt-dlp printed for the downloaded entry.
pub fn parse_info(stdout: &str) -> Result<YtDlpInfo, AppError> {
    let line = stdout
        .lines()
        .map(str::trim)
        .rev()
        .find(|l| l.starts_with('{'))
        .ok_or_else(|| AppError::Download(DownloadError::YtDlp("yt-dlp printed no video information".to_string())))?;

    serde_json::from_str(line)
        .map_err(|e| AppError::Download(DownloadError::YtDlp(format!("Failed to parse yt-dlp output: {}", e))))
}

/// Whether `name` is a yt-dlp leftover rather than a finished file
/// (`id.f137.mp4`, `id.mp4.part`, `id.temp.mp4`, `id.mp4.ytdl`).
pub fn is_intermediate_file(name: &str) -> bool {
    if name.ends_with(".part") || name.ends_with(".ytdl") {
        return true;
    }
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() < 3 {
        return false;
    }
    parts[1..parts.len() - 1].iter().any(|middle| {
        *middle == "temp"
            || (middle.len() > 1 && middle.starts_with('f') && middle[1..].chars().all(|c| c.is_ascii_digit()))
    })
}

/// Finds the finished file for `id` in `dir`, preferring `preferred_ext`, then the largest.
pub fn find_downloaded_file(dir: &Path, id: &str, preferred_ext: Option<&str>) -> Result<PathBuf, AppError> {
    let prefix = format!("{}.", id);
    let mut candidates: Vec<(PathBuf, u64)> = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if (!id.is_empty() && !name.starts_with(&prefix)) || is_intermediate_file(&name) {
            continue;
        }
        let metadata = entry.metadata()?;
        if metadata.is_file() {
            candidates.push((entry.path(), metadata.len()));
        }
    }

    if let Some(ext) = preferred_ext {
        if let Some((path, _)) = candidates
            .iter()
            .find(|(path, _)| path.extension().and_then(|e| e.to_str()) == Some(ext))
        {
            return Ok(path.clone());
        }
    }

    candidates
        .into_iter()
        .max_by_key(|(_, size)| *size)
        .map(|(path, _)| path)
        .ok_or_else(|| {
            AppError::Download(DownloadError::FileNotFound(format!(
                "Downloaded file not found in {}",
                dir.display()
            )))
        })
}

/// Resolves where yt-dlp actually saved the file.
fn resolve_output_path(info: &YtDlpInfo, workdir: &Path) -> Result<PathBuf, AppError> {
    let reported = [info.filename.as_deref(), info.legacy_filename.as_deref()]
        .into_iter()
        .flatten()
        .map(PathBuf::from)
        .find(|path| path.is_file());

    if let Some(path) = reported {
        return Ok(path);
    }

    log::warn!(
        "yt-dlp reported {:?}, searching {} instead",
        info.filename,
        workdir.display()
    );
    find_downloaded_file(workdir, &info.id, Some(MERGE_OUTPUT_FORMAT))
}

#[async_trait]
impl DownloadSource for YtDlpSource {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn download(&self, request: &DownloadRequest) -> Result<DownloadOutput, AppError> {
        log::info!("🎬 yt-dlp download: {}", request.url);

        let args = Self::build_args(&request.url, &request.workdir);
        log::debug!("yt-dlp command: {} {}", self.bin, args.join(" "));

        let mut cmd = Command::new(&self.bin);
        cmd.args(&args).stdin(Stdio::null());
        let output = run_with_timeout(&mut cmd, self.timeout).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let error_type = analyze_ytdlp_error(&stderr);
            log::error!(
                "yt-dlp failed ({}) with {} for {}",
                error_type.as_str(),
                output.status,
                request.url
            );
            log::error!("yt-dlp stderr: {}", stderr.trim());
            return Err(AppError::Download(DownloadError::YtDlp(user_facing_error(&stderr))));
        }

        let info = parse_info(&String::from_utf8_lossy(&output.stdout))?;
        let file_path = resolve_output_path(&info, &request.workdir)?;
        let file_size = tokio::fs::metadata(&file_path).await?.len();

        log::info!(
            "✅ yt-dlp saved {} ({:.2} MB), title={:?}",
            file_path.display(),
            file_size as f64 / (1024.0 * 1024.0),
            info.title
        );

        Ok(DownloadOutput {
            file_path,
            file_size,
            info: Some(info.media_info()),
        })
    }
}

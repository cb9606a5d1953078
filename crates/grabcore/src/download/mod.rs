//! Download management: routing, sources, scratch space and delivery rules

pub mod delivery;
pub mod error;
pub mod route;
pub mod source;
pub mod workspace;
pub mod ytdlp_errors;

// Re-exports for convenience
pub use delivery::{
    check_upload_limit, compose_caption, large_file_notice, DeliveryMode, DIRECT_LARGE_FILE_NOTICE, LARGE_FILE_NOTICE,
};
pub use error::DownloadError;
pub use route::{classify, Route};
pub use source::{DownloadOutput, DownloadRequest, DownloadSource, MediaInfo, SourceRegistry};
pub use workspace::TempWorkspace;

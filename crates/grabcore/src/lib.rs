//! grabcore - link routing and media fetching for grabbot
//!
//! Everything here is independent of Telegram: deciding how a link is
//! fetched, fetching it into a scratch directory, and the rules that decide
//! how the result is delivered.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging and subprocess helpers
//! - `download`: Routing, download sources, workspaces and delivery rules

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod core;
pub mod download;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use download::{classify, DeliveryMode, DownloadSource, Route, SourceRegistry, TempWorkspace};

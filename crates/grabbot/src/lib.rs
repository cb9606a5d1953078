//! grabbot - Telegram bot that turns a media link into a video in the chat
//!
//! # Module Structure
//!
//! - `cli`: Command line interface
//! - `pipeline`: Per-message download and delivery workflow
//! - `telegram`: Bot creation, dispatcher schema and the outgoing message seam

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod cli;
pub mod pipeline;
pub mod telegram;

// Re-export commonly used types for convenience
pub use pipeline::{DeliveryOutcome, Pipeline, PROCESSING_NOTICE};
pub use telegram::{create_bot, schema, HandlerDeps, MediaSender};

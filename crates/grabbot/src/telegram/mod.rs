//! Telegram bot integration and handlers

pub mod bot;
pub mod handlers;
pub mod sender;

pub use bot::{create_bot, is_transient, setup_bot_commands, wait_for_bot_api, Command};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use sender::MediaSender;
pub use teloxide::Bot;

//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::handle_start_command;
use super::types::{HandlerDeps, HandlerError};
use crate::telegram::bot::{is_download_request, Command};
use crate::telegram::Bot;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Two branches: the `/start` command, then any plain text message, which is
/// handed to the download pipeline. Unknown commands match neither branch.
///
/// # Arguments
/// * `deps` - Handler dependencies (the shared pipeline)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry()
        // Command handler
        .branch(command_handler())
        // Message handler for links
        .branch(message_handler(deps))
}

fn command_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        |bot: Bot, msg: Message, cmd: Command| async move {
            log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);

            match cmd {
                Command::Start => {
                    handle_start_command(&bot, msg.chat.id).await?;
                }
            }
            Ok(())
        },
    ))
}

fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().map(is_download_request).unwrap_or(false))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                if let Some(text) = msg.text() {
                    deps.pipeline.process_message(&bot, msg.chat.id, text).await;
                }
                Ok(())
            }
        })
}

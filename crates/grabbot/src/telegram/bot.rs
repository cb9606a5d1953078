//! Bot initialization and message routing utilities
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation and the startup wait for the Bot API
//! - The text filter deciding which messages start a download

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, Me};
use teloxide::RequestError;
use teloxide::utils::command::BotCommands;

use grabcore::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "show the greeting")]
    Start,
}

/// Creates a Bot instance with custom or default API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Missing token, invalid `BOT_API_URL` or client build failure
pub fn create_bot() -> anyhow::Result<Bot> {
    let token = config::require_bot_token()?;
    let client = ClientBuilder::new()
        .timeout(config::network::timeout())
        .connect_timeout(config::network::connect_timeout())
        .build()?;

    let bot = Bot::with_client(token, client);

    let bot = match config::BOT_API_URL.as_deref() {
        Some(bot_api_url) => {
            log::info!("Using custom Bot API URL: {}", bot_api_url);
            let url = url::Url::parse(bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
            bot.set_api_url(url)
        }
        None => bot,
    };

    Ok(bot)
}

/// Sets up bot commands in Telegram UI
///
/// # Returns
/// * `Ok(())` - Commands set successfully
/// * `Err(RequestError)` - Failed to set commands
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = Command::bot_commands();
    bot.set_my_commands(commands).await?;
    Ok(())
}

/// Whether a failed Bot API call may succeed if repeated.
///
/// Transport failures and flood control are; API refusals (bad token and
/// the like) are not.
pub fn is_transient(err: &RequestError) -> bool {
    matches!(
        err,
        RequestError::Network(_) | RequestError::Io(_) | RequestError::RetryAfter(_)
    )
}

/// Calls `getMe` until the Bot API answers.
///
/// A self-hosted Bot API server may still be starting when the bot comes up,
/// so transient failures are retried up to `STARTUP_MAX_RETRIES` times.
pub async fn wait_for_bot_api(bot: &Bot) -> anyhow::Result<Me> {
    let max_attempts = config::retry::STARTUP_MAX_RETRIES;
    let mut attempt = 0;
    loop {
        attempt += 1;
        let err = match bot.get_me().await {
            Ok(me) => return Ok(me),
            Err(e) => e,
        };
        if attempt >= max_attempts || !is_transient(&err) {
            anyhow::bail!("Bot API unreachable after {} attempt(s): {}", attempt, err);
        }

        let delay = match &err {
            RequestError::RetryAfter(secs) => secs.duration(),
            _ => config::retry::dispatcher_delay(),
        };
        log::warn!(
            "Bot API not ready ({}/{}): {}. Next try in {}s",
            attempt,
            max_attempts,
            err,
            delay.as_secs()
        );
        tokio::time::sleep(delay).await;
    }
}

/// Whether a message text should be treated as a link to download.
///
/// Anything starting with `/` is a command (known or not) and never downloaded.
pub fn is_download_request(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && !trimmed.starts_with('/')
}

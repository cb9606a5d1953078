//! Command handler implementations (/start)

use grabcore::AppError;
use teloxide::types::ChatId;

use crate::telegram::sender::MediaSender;

/// Reply to /start
pub const GREETING: &str =
    "👋 Hi! Send me a video link from YouTube, Twitter/X, Instagram, or TikTok, and I'll download it for you!";

/// Handle /start command
pub async fn handle_start_command(sender: &dyn MediaSender, chat_id: ChatId) -> Result<(), AppError> {
    log::info!("👋 /start from chat {}", chat_id);
    sender.send_text(chat_id, GREETING).await
}

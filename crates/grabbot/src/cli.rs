use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "grabbot")]
#[command(author, version, about = "Telegram bot that downloads videos from links and sends them back", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot with long polling (default)
    Run,

    /// Download a link without Telegram, the way the bot would
    Fetch {
        /// Link to download
        url: String,

        /// Directory the file is moved into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Print the yt-dlp version and exit
    Check,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

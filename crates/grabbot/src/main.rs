use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio::time::sleep;

use grabbot::cli::{Cli, Commands};
use grabbot::pipeline::Pipeline;
use grabbot::telegram::{create_bot, schema, setup_bot_commands, wait_for_bot_api, Bot, HandlerDeps, HandlerError};
use grabcore::core::{config, init_logger, log_startup_configuration};
use grabcore::download::delivery::compose_caption;
use grabcore::download::source::ytdlp::YtDlpSource;
use grabcore::{SourceRegistry, TempWorkspace};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, token, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Load environment variables from .env before any config value is read
    let _ = dotenv();

    // Set up global panic handler so panics inside handlers end up in the log
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    // Dispatch to appropriate command
    match cli.command {
        Some(Commands::Run) => run_bot().await,
        Some(Commands::Fetch { url, output }) => run_cli_fetch(url, output).await,
        Some(Commands::Check) => run_cli_check().await,
        None => {
            // No command specified - default to running the bot
            log::info!("No command specified, running bot in default mode");
            run_bot().await
        }
    }
}

/// Runs the bot until the dispatcher shuts down
async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");
    log_startup_configuration();

    match YtDlpSource::new().check_version().await {
        Ok(version) => log::info!("yt-dlp version: {}", version),
        Err(e) => log::warn!("yt-dlp is not usable ({}). Continuing anyway.", e),
    }

    let download_root = config::download_root();
    tokio::fs::create_dir_all(&download_root).await?;
    log::info!("Download root: {}", download_root.display());

    let registry = Arc::new(SourceRegistry::default_registry()?);
    let deps = HandlerDeps::new(Arc::new(Pipeline::new(registry, download_root)));

    // Create bot instance
    let bot = create_bot()?;

    let me = wait_for_bot_api(&bot).await?;
    log::info!("Bot username: {:?}, Bot ID: {}", me.username, me.id);

    setup_bot_commands(&bot).await?;

    run_dispatcher(bot, schema(deps)).await;
    Ok(())
}

/// Polls for updates until shutdown, restarting the dispatcher after a panic.
async fn run_dispatcher(bot: Bot, handler: UpdateHandler<HandlerError>) {
    let max_restarts = config::retry::MAX_DISPATCHER_RETRIES;
    let mut restarts = 0;
    loop {
        // a panic inside the dispatcher surfaces through the JoinHandle
        let task = tokio::spawn(dispatch_updates(bot.clone(), handler.clone()));
        match task.await {
            Ok(()) => {
                log::info!("Dispatcher stopped");
                return;
            }
            Err(e) if !e.is_panic() => {
                log::warn!("Dispatcher task cancelled: {}", e);
                return;
            }
            Err(e) if restarts >= max_restarts => {
                log::error!("Dispatcher panicked after {} restarts, giving up: {}", restarts, e);
                return;
            }
            Err(e) => {
                restarts += 1;
                log::error!("Dispatcher panicked ({}), restart {}/{}", e, restarts, max_restarts);
                exponential_backoff(restarts).await;
            }
        }
    }
}

async fn dispatch_updates(bot: Bot, handler: UpdateHandler<HandlerError>) {
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();
    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(listener, LoggingErrorHandler::with_custom_text("Update listener error"))
        .await;
}

/// Downloads `url` the way the bot would and moves the file into `output`
async fn run_cli_fetch(url: String, output: PathBuf) -> Result<()> {
    let download_root = config::download_root();
    let registry = Arc::new(SourceRegistry::default_registry()?);
    let pipeline = Pipeline::new(registry, download_root);

    let workspace = TempWorkspace::create(pipeline.download_root()).await?;
    let (_, result) = pipeline.fetch(url.trim(), workspace.path()).await?;
    let saved = workspace.persist(&result.file_path, &output).await?;

    println!("{} ({} bytes)", saved.display(), result.file_size);
    if let Some(info) = &result.info {
        println!();
        println!("{}", compose_caption(info));
    }
    Ok(())
}

/// Prints the yt-dlp version
async fn run_cli_check() -> Result<()> {
    let source = YtDlpSource::new();
    let version = source.check_version().await?;
    println!("{} {}", source.binary(), version);
    Ok(())
}

/// Exponential backoff delay for retries
async fn exponential_backoff(retry_count: u32) {
    let delay = Duration::from_secs(config::retry::EXPONENTIAL_BACKOFF_BASE.pow(retry_count));
    sleep(delay).await;
}

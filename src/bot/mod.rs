//! Telegram front-end: dispatcher setup and long polling.

pub mod handlers;
pub mod replies;

pub use handlers::{BotError, BotState, BroadcastPlan, Command};

use crate::commands::SearchCommand;
use crate::config::Config;
use crate::health;
use crate::store::InMemoryUserStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

/// Starts the liveness endpoint and runs the bot until interrupted.
pub async fn run(config: Config) -> Result<()> {
    let token = config
        .telegram_token
        .clone()
        .context("TELEGRAM_TOKEN is not set; the bot cannot start")?;

    if config.admin_id.is_none() {
        warn!("No admin configured; /stats and /broadcast are disabled");
    }

    let health = health::spawn(config.port).await?;

    let marketplace = config.marketplace;
    let search = SearchCommand::new(config)?;
    let store = Arc::new(InMemoryUserStore::spawn());
    let state = Arc::new(BotState::new(search, store));

    let bot = Bot::new(token);
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }

    info!("Bot started, searching {}", marketplace.display_name());

    Dispatcher::builder(bot, handlers::schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot stopped");
    health.abort();
    Ok(())
}

//! Update handlers for commands, callbacks and free-text queries.

use crate::bot::replies::{self, Reply};
use crate::commands::SearchCommand;
use crate::config::Config;
use crate::query::Query;
use crate::store::{RateDecision, StoreError, UserId, UserStore};
use std::sync::Arc;
use std::time::Duration;
use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ParseMode};
use teloxide::utils::command::BotCommands;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Pause between messages of a broadcast, keeping under Telegram's limits.
const BROADCAST_THROTTLE: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

type HandlerResult = Result<(), BotError>;

#[derive(Debug, Clone, PartialEq, BotCommands)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    /// Приветствие
    Start,
    /// Справка
    Help,
    /// Число пользователей (админ)
    Stats,
    /// Рассылка всем пользователям (админ)
    Broadcast(String),
}

/// What a `/broadcast` request turns into.
#[derive(Debug, PartialEq)]
pub enum BroadcastPlan {
    /// Send the text to these users.
    Send(Vec<UserId>),
    /// Answer the caller instead (refusal or usage hint).
    Reply(Reply),
}

/// Shared state handed to every handler.
pub struct BotState {
    search: SearchCommand,
    store: Arc<dyn UserStore>,
}

impl BotState {
    pub fn new(search: SearchCommand, store: Arc<dyn UserStore>) -> Self {
        Self { search, store }
    }

    pub fn config(&self) -> &Config {
        self.search.config()
    }

    /// Builds the reply to a free-text message from `user`.
    ///
    /// Invalid queries are answered before the rate limit is consulted, so
    /// they never use up the user's window.
    pub async fn answer_text(&self, user: UserId, text: &str) -> Result<Reply, StoreError> {
        let marketplace = self.config().marketplace;

        if Query::parse(text).is_err() {
            return Ok(replies::too_short());
        }

        if let RateDecision::Limited { retry_after } =
            self.store.check_rate(user, self.config().rate_limit()).await?
        {
            debug!("User {} rate limited for {:?}", user, retry_after);
            return Ok(replies::rate_limited(retry_after));
        }

        Ok(match self.search.run(text).await {
            Ok(outcome) => replies::outcome(marketplace, &outcome),
            Err(e) => {
                warn!("Search for user {} failed: {}", user, e);
                replies::search_error(marketplace, &e)
            }
        })
    }

    /// Builds the reply to `/stats`, or a refusal for non-admins.
    pub async fn answer_stats(&self, user: UserId) -> Result<Reply, StoreError> {
        if !self.config().is_admin(user) {
            return Ok(replies::not_admin());
        }
        Ok(replies::stats(self.store.count().await?))
    }

    /// Decides who receives a broadcast of `text` requested by `user`.
    pub async fn broadcast_plan(
        &self,
        user: UserId,
        text: &str,
    ) -> Result<BroadcastPlan, StoreError> {
        if !self.config().is_admin(user) {
            warn!("User {} tried to broadcast", user);
            return Ok(BroadcastPlan::Reply(replies::not_admin()));
        }

        if text.trim().is_empty() {
            return Ok(BroadcastPlan::Reply(replies::broadcast_usage()));
        }

        Ok(BroadcastPlan::Send(self.store.users().await?))
    }
}

/// Builds the dispatcher's handler tree.
pub fn schema() -> UpdateHandler<BotError> {
    let message_handler = Update::filter_message()
        .branch(dptree::entry().filter_command::<Command>().endpoint(handle_command))
        .branch(dptree::endpoint(handle_message));

    let callback_handler = Update::filter_callback_query().endpoint(handle_callback);

    dptree::entry().branch(message_handler).branch(callback_handler)
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> HandlerResult {
    let mut request = bot.send_message(chat_id, reply.text).parse_mode(ParseMode::Html);
    if let Some(keyboard) = reply.keyboard {
        request = request.reply_markup(keyboard);
    }
    request.await?;
    Ok(())
}

async fn handle_command(
    bot: Bot,
    state: Arc<BotState>,
    msg: Message,
    command: Command,
) -> HandlerResult {
    let Some(user) = msg.from.as_ref().map(|u| u.id.0) else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    if state.store.register(user).await? {
        info!("New user {}", user);
    }

    match command {
        Command::Start => {
            send_reply(&bot, chat_id, replies::greeting(state.config().marketplace)).await
        }
        Command::Help => send_reply(&bot, chat_id, replies::help(state.config().is_admin(user))).await,
        Command::Stats => send_reply(&bot, chat_id, state.answer_stats(user).await?).await,
        Command::Broadcast(text) => handle_broadcast(&bot, &state, chat_id, user, text.trim()).await,
    }
}

async fn handle_broadcast(
    bot: &Bot,
    state: &BotState,
    chat_id: ChatId,
    user: UserId,
    text: &str,
) -> HandlerResult {
    let recipients = match state.broadcast_plan(user, text).await? {
        BroadcastPlan::Send(recipients) => recipients,
        BroadcastPlan::Reply(reply) => return send_reply(bot, chat_id, reply).await,
    };
    info!("Broadcasting to {} users", recipients.len());

    let mut delivered = 0;
    let mut failed = 0;

    for recipient in recipients {
        let target = ChatId::from(teloxide::types::UserId(recipient));
        match bot.send_message(target, text).await {
            Ok(_) => delivered += 1,
            Err(e) => {
                debug!("Broadcast to {} failed: {}", recipient, e);
                failed += 1;
            }
        }
        tokio::time::sleep(BROADCAST_THROTTLE).await;
    }

    info!("Broadcast finished: {} delivered, {} failed", delivered, failed);
    send_reply(bot, chat_id, replies::broadcast_report(delivered, failed)).await
}

async fn handle_message(bot: Bot, state: Arc<BotState>, msg: Message) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(user) = msg.from.as_ref().map(|u| u.id.0) else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    if state.store.register(user).await? {
        info!("New user {}", user);
    }

    // unknown command
    if text.starts_with('/') {
        return send_reply(&bot, chat_id, replies::help(state.config().is_admin(user))).await;
    }

    if let Err(e) = bot.send_chat_action(chat_id, ChatAction::Typing).await {
        debug!("Failed to send typing action: {}", e);
    }

    let reply = state.answer_text(user, text).await?;
    send_reply(&bot, chat_id, reply).await
}

async fn handle_callback(bot: Bot, q: CallbackQuery) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    if q.data.as_deref() != Some(replies::START_CHAT_CALLBACK) {
        return Ok(());
    }

    if let Some(message) = q.message.as_ref() {
        bot.edit_message_text(message.chat().id, message.id(), replies::PROMPT).await?;
    }

    Ok(())
}

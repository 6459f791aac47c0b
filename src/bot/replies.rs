//! Reply texts and keyboards, built without touching Telegram.
//!
//! Every text is HTML for [`ParseMode::Html`]; user-supplied and
//! marketplace-supplied strings are escaped.
//!
//! [`ParseMode::Html`]: teloxide::types::ParseMode::Html

use crate::commands::{SearchError, SearchOutcome};
use crate::market::models::group_thousands;
use crate::market::{Marketplace, Product};
use std::time::Duration;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::html;
use url::Url;

/// Callback data of the greeting button.
pub const START_CHAT_CALLBACK: &str = "start_chat";

/// Text the greeting is replaced with once the button is pressed.
pub const PROMPT: &str = "Что вы ищете сегодня?";

/// A message ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), keyboard: None }
    }

    fn with_keyboard(mut self, keyboard: Option<InlineKeyboardMarkup>) -> Self {
        self.keyboard = keyboard;
        self
    }
}

fn url_button(label: impl Into<String>, link: &str) -> Option<InlineKeyboardMarkup> {
    // an unparsable link still appears in the text
    let url = Url::parse(link).ok()?;
    Some(InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(label, url)]]))
}

/// Greeting for `/start`.
pub fn greeting(marketplace: Marketplace) -> Reply {
    let text = format!(
        "👋 Привет! Я — {} по поиску товаров на {}.\n\n\
         Я помогу тебе найти {}.\n\n\
         Задай мне любой вопрос, например:\n\
         • {}\n\
         • {}\n\n\
         Я подберу лучшие варианты: много отзывов и честная цена!",
        html::bold("умный помощник"),
        marketplace.display_name(),
        html::bold("то, что действительно нужно"),
        html::bold("Ищу недорогие наушники для бега"),
        html::bold("Нужны кроссовки для парня до 5000₽"),
    );

    let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "🔍 Начать диалог",
        START_CHAT_CALLBACK,
    )]]);

    Reply::text(text).with_keyboard(Some(keyboard))
}

/// Command list for `/help`.
pub fn help(is_admin: bool) -> Reply {
    let mut text = String::from(
        "Просто напишите, что вы ищете, и я покажу до 5 лучших товаров.\n\n\
         /start — приветствие\n\
         /help — эта справка",
    );

    if is_admin {
        text.push_str("\n/stats — число пользователей\n/broadcast текст — рассылка всем");
    }

    Reply::text(text)
}

/// Query rejected before searching.
pub fn too_short() -> Reply {
    Reply::text("❌ Слишком короткий запрос.")
}

/// User asked again before the rate-limit window passed.
pub fn rate_limited(retry_after: Duration) -> Reply {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    Reply::text(format!("⏳ Подождите {} с. перед следующим запросом.", secs.max(1)))
}

fn product_card(position: usize, product: &Product) -> String {
    let mut card = format!(
        "{}. {}\n💰 {} ₽ · 💬 {} отзывов",
        position,
        html::link(&product.link, &html::escape(&product.name)),
        group_thousands(product.price),
        product.review_count,
    );

    if let Some(rating) = product.rating {
        card.push_str(&format!(" · ⭐ {:.1}", rating));
    }

    card
}

/// Reply for a completed search.
pub fn outcome(marketplace: Marketplace, outcome: &SearchOutcome) -> Reply {
    let button_label = format!("🛒 Все товары на {}", marketplace.display_name());

    match outcome {
        SearchOutcome::Found { query, products, link } => {
            let cards: Vec<String> =
                products.iter().enumerate().map(|(i, p)| product_card(i + 1, p)).collect();

            let text = format!(
                "🔍 Я понял, что вы ищете: {}\n\n🏆 Лучшие предложения на {}:\n\n{}",
                html::bold(&html::escape(query)),
                marketplace.display_name(),
                cards.join("\n\n"),
            );

            Reply::text(text).with_keyboard(url_button(button_label, link))
        }
        SearchOutcome::Empty { query, link } => {
            let text = format!(
                "😕 По запросу {} ничего не нашлось.\nПопробуйте переформулировать запрос \
                 или посмотрите сами: {}",
                html::bold(&html::escape(query)),
                html::link(link, "поиск на сайте"),
            );

            Reply::text(text).with_keyboard(url_button(button_label, link))
        }
    }
}

/// Reply for a search that produced no outcome.
pub fn search_error(marketplace: Marketplace, error: &SearchError) -> Reply {
    match error {
        SearchError::InvalidQuery(_) => too_short(),
        SearchError::Unavailable { link, .. } => {
            let text = format!(
                "⚠️ Не удалось получить товары с {}. Попробуйте поискать вручную: {}",
                marketplace.display_name(),
                html::link(link, "открыть поиск"),
            );

            Reply::text(text).with_keyboard(url_button("🛒 Искать вручную", link))
        }
    }
}

/// Number of known users for `/stats`.
pub fn stats(users: usize) -> Reply {
    Reply::text(format!("👥 Пользователей: {}", users))
}

/// Refusal for admin commands.
pub fn not_admin() -> Reply {
    Reply::text("⛔ Команда доступна только администратору.")
}

/// Hint for `/broadcast` without text.
pub fn broadcast_usage() -> Reply {
    Reply::text("Использование: /broadcast текст сообщения")
}

/// Summary after a broadcast.
pub fn broadcast_report(delivered: usize, failed: usize) -> Reply {
    Reply::text(format!("📣 Рассылка завершена: доставлено {}, ошибок {}.", delivered, failed))
}

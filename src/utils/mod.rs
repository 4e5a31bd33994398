//! Utility functions.
//!
//! Markup parsing, message splitting and small Telegram helpers shared by
//! the command handlers and the group lookup.

pub mod markup;
pub mod split;

use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ReplyParameters};
use tracing::warn;

use crate::bot::dispatcher::ThrottledBot;
use crate::database::models::InlineButton;

/// How long transient group notices stay up before self-deleting.
pub const NOTICE_TTL: Duration = Duration::from_secs(10);

/// Turn stored button rows into a Telegram keyboard.
///
/// Buttons whose URL does not parse are dropped; returns `None` when no
/// valid button remains.
pub fn build_keyboard(rows: &[Vec<InlineButton>]) -> Option<InlineKeyboardMarkup> {
    let rows: Vec<Vec<InlineKeyboardButton>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .filter_map(|btn| {
                    btn.url
                        .parse()
                        .ok()
                        .map(|url| InlineKeyboardButton::url(&btn.label, url))
                })
                .collect()
        })
        .filter(|row: &Vec<_>| !row.is_empty())
        .collect();

    if rows.is_empty() {
        None
    } else {
        Some(InlineKeyboardMarkup::new(rows))
    }
}

/// Reply to a message and delete the bot's reply after `after`.
///
/// Fire and forget: the send and the delayed delete are both best-effort,
/// and the reply may already be gone when the delete runs.
pub fn reply_then_delete(
    bot: &ThrottledBot,
    msg: &Message,
    text: impl Into<String>,
    after: Duration,
) {
    let bot = bot.clone();
    let chat_id = msg.chat.id;
    let reply_to = msg.id;
    let text = text.into();

    tokio::spawn(async move {
        let sent = match bot
            .send_message(chat_id, text)
            .reply_parameters(ReplyParameters::new(reply_to))
            .await
        {
            Ok(m) => m,
            Err(e) => {
                warn!("Failed to send transient notice in {}: {}", chat_id, e);
                return;
            }
        };

        tokio::time::sleep(after).await;
        let _ = bot.delete_message(chat_id, sent.id).await;
    });
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

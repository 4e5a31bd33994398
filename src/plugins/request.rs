//! /request command plugin.
//!
//! Records a missing-movie request and pings the configured admins.

use teloxide::prelude::*;
use teloxide::types::{ParseMode, ReplyParameters};
use tracing::{info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::MovieRequest;
use crate::utils::html_escape;

/// Handle /request <movie name>.
pub async fn request_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let movie_name = args.trim();
    if movie_name.is_empty() {
        bot.send_message(msg.chat.id, "⚠️ Usage: /request <Movie Name>")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let request = MovieRequest::new(movie_name, user.id.0 as i64, msg.chat.id.0);
    state.requests.record(&request).await?;

    info!("Movie request '{}' from {} in {}", movie_name, user.id, msg.chat.id);

    notify_admins(&bot, &state, movie_name, user, &msg.chat).await;

    bot.send_message(
        msg.chat.id,
        "✅ Request received! The admins will add it soon 🎬",
    )
    .reply_parameters(ReplyParameters::new(msg.id))
    .await?;

    Ok(())
}

/// Forward a request to every configured admin, best-effort.
pub async fn notify_admins(
    bot: &ThrottledBot,
    state: &AppState,
    movie_name: &str,
    user: &teloxide::types::User,
    chat: &teloxide::types::Chat,
) {
    let origin = if chat.is_private() {
        "private chat".to_string()
    } else {
        chat.title().unwrap_or("Unknown Group").to_string()
    };

    let note = format!(
        "📩 <b>New request</b>\n🎬 Movie: {}\n👤 From: {} (<code>{}</code>)\n💬 In: {}",
        html_escape(movie_name),
        html_escape(&user.full_name()),
        user.id,
        html_escape(&origin),
    );

    for &admin_id in &state.admin_ids {
        let result = bot
            .send_message(ChatId(admin_id as i64), &note)
            .parse_mode(ParseMode::Html)
            .await;
        if let Err(e) = result {
            warn!("Could not notify admin {}: {}", admin_id, e);
        }
    }
}

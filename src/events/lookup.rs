//! Fuzzy keyword lookup for group messages.
//!
//! Every plain text message is scored against the chat's keywords; the
//! best match above the threshold gets the stored scenepack as a reply.
//! Misses from regular members become movie requests.

use teloxide::prelude::*;
use tracing::{debug, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::MovieRequest;
use crate::matching::best_match;
use crate::plugins::{filters, request};
use crate::utils::{NOTICE_TTL, reply_then_delete};

/// Match a group message against the chat's keywords and reply.
pub async fn check_message(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
) -> anyhow::Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(());
    }

    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    if user.is_bot {
        return Ok(());
    }

    let chat_id = msg.chat.id;
    let keywords = state.filters.keywords(chat_id.0).await?;

    let Some(hit) = best_match(&keywords, text) else {
        return handle_miss(bot, msg, state, user, text).await;
    };

    debug!(
        "Matched '{}' (score {:.1}) in chat {}",
        hit.keyword, hit.score, chat_id
    );

    // The record may be gone if a delete raced the cached keyword list.
    let Some(record) = state.filters.get(chat_id.0, hit.keyword).await? else {
        return Ok(());
    };

    if let Err(e) = filters::send_record(bot, chat_id, &record, Some(msg.id)).await {
        warn!(
            "Could not deliver filter '{}' in {}: {}",
            record.keyword, chat_id, e
        );
    }

    Ok(())
}

/// No keyword cleared the threshold: notify, record, ping the admins.
async fn handle_miss(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
    user: &teloxide::types::User,
    text: &str,
) -> anyhow::Result<()> {
    // Admin chatter in the group is not a movie request.
    if state.is_admin(user.id) {
        return Ok(());
    }

    reply_then_delete(
        bot,
        msg,
        "😔 Sorry, this movie is not available yet.\n\
         📝 Your request was sent to the admins. It will be added soon!",
        NOTICE_TTL,
    );

    let movie_request = MovieRequest::new(text, user.id.0 as i64, msg.chat.id.0);
    if let Err(e) = state.requests.record(&movie_request).await {
        warn!("Failed to record movie request '{}': {}", text, e);
    }

    request::notify_admins(bot, state, text, user, &msg.chat).await;

    Ok(())
}

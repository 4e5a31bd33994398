//! /start command plugin.
//!
//! Handles the /start command and sends a welcome message.

use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot::dispatcher::{AppState, ThrottledBot};

/// Handle the /start command.
pub async fn start_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;

    let is_admin = msg
        .from
        .as_ref()
        .map(|u| state.is_admin(u.id))
        .unwrap_or(false);

    let text = if msg.chat.is_private() && is_admin {
        "👋 <b>Hello, admin!</b>\n\n\
         I auto-reply with scene packs when someone types a movie name in your groups.\n\n\
         <b>Quick start:</b>\n\
         • /connect &lt;group_id&gt; picks the group to manage\n\
         • Send a photo with caption <code>/filter \"keyword\" text</code> to save a filter\n\
         • /filters browses, previews, copies or deletes saved filters\n\
         • /status shows storage stats, backup, import and clear"
    } else {
        "👋 <b>Hello!</b> I'm the ScenesPacks bot 🎬\n\n\
         Type a movie name in the group and I'll send its scene pack if I have it.\n\
         Missing one? Ask with /request &lt;movie name&gt; and the admins will add it."
    };

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

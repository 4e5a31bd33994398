//! Group connection commands.
//!
//! Admins drive the bot from private chat: /connect binds a group by ID,
//! /connections lists the saved ones with an inline management menu.
//! The active group is the target of every filter mutation.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{GroupConnection, KnownGroup};
use crate::utils::html_escape;

/// Handle /connect <group_id>.
pub async fn connect_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    if !msg.chat.is_private() || !state.is_admin(user.id) {
        return Ok(());
    }

    let group_id: i64 = match args.trim().parse() {
        Ok(id) => id,
        Err(_) => {
            bot.send_message(
                msg.chat.id,
                "⚠️ Invalid Group ID format.\nUsage: /connect -1001234567890",
            )
            .await?;
            return Ok(());
        }
    };

    // Title lookup is best-effort; the bot may not be in the group yet.
    let name = match bot.get_chat(ChatId(group_id)).await {
        Ok(chat) => chat
            .title()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "Unknown Group".to_string()),
        Err(_) => "Unknown Group".to_string(),
    };

    let group = KnownGroup {
        id: group_id,
        name: name.clone(),
    };
    state.connections.connect(user.id.0 as i64, &group).await?;

    info!("Admin {} connected group {} ({})", user.id, group_id, name);

    let text = format!(
        "✅ Connected to <b>{}</b> (<code>{}</code>).\nIt is now your active group.",
        html_escape(&name),
        group_id
    );
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

/// Handle /connections.
pub async fn connections_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    if !msg.chat.is_private() || !state.is_admin(user.id) {
        return Ok(());
    }

    let conn = state.connections.get(user.id.0 as i64).await?;
    let Some(conn) = conn.filter(|c| !c.groups.is_empty()) else {
        bot.send_message(
            msg.chat.id,
            "📭 You haven't connected any group yet.\nUse /connect <group_id> first.",
        )
        .await?;
        return Ok(());
    };

    let (text, keyboard) = connections_view(&conn);
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await?;

    Ok(())
}

/// Handle conn: callback buttons (group management menu).
pub async fn connection_callback(
    bot: ThrottledBot,
    q: CallbackQuery,
    state: AppState,
) -> anyhow::Result<()> {
    let data = match &q.data {
        Some(d) => d,
        None => return Ok(()),
    };

    if !state.is_admin(q.from.id) {
        bot.answer_callback_query(&q.id)
            .text("🚫 This menu is for admins only.")
            .show_alert(true)
            .await?;
        return Ok(());
    }

    let Some(message) = q.message.as_ref() else {
        bot.answer_callback_query(&q.id).await?;
        return Ok(());
    };
    let chat_id = message.chat().id;
    let message_id = message.id();
    let admin_id = q.from.id.0 as i64;

    let rest = data.strip_prefix("conn:").unwrap_or_default();

    if rest == "back" {
        match state.connections.get(admin_id).await? {
            Some(conn) if !conn.groups.is_empty() => {
                let (text, keyboard) = connections_view(&conn);
                let _ = bot
                    .edit_message_text(chat_id, message_id, text)
                    .parse_mode(ParseMode::Html)
                    .reply_markup(keyboard)
                    .await;
            }
            _ => {
                let _ = bot
                    .edit_message_text(chat_id, message_id, "📭 No connected groups left.")
                    .await;
            }
        }
        bot.answer_callback_query(&q.id).await?;
        return Ok(());
    }

    let Some((action, id_str)) = rest.split_once(':') else {
        bot.answer_callback_query(&q.id).await?;
        return Ok(());
    };
    let Ok(group_id) = id_str.parse::<i64>() else {
        bot.answer_callback_query(&q.id).await?;
        return Ok(());
    };

    let conn = state.connections.get(admin_id).await?;
    let name = conn
        .as_ref()
        .and_then(|c| c.group_name(group_id))
        .unwrap_or("Unknown Group")
        .to_string();
    let is_active = conn.as_ref().and_then(|c| c.active_group) == Some(group_id);

    match action {
        "menu" => {
            let marker = if is_active { " (active)" } else { "" };
            let text = format!(
                "⚙️ <b>{}</b>{}\nWhat do you want to do?",
                html_escape(&name),
                marker
            );
            let _ = bot
                .edit_message_text(chat_id, message_id, text)
                .parse_mode(ParseMode::Html)
                .reply_markup(group_menu(group_id))
                .await;
            bot.answer_callback_query(&q.id).await?;
        }
        "set" => {
            state.connections.set_active(admin_id, group_id).await?;
            let text = format!("✅ <b>{}</b> is now your active group.", html_escape(&name));
            let _ = bot
                .edit_message_text(chat_id, message_id, text)
                .parse_mode(ParseMode::Html)
                .reply_markup(back_markup())
                .await;
            bot.answer_callback_query(&q.id)
                .text("Active group updated")
                .await?;
        }
        "status" => {
            let filter_count = state.filters.keywords(group_id).await?.len();
            let text = format!(
                "📊 <b>{}</b>\nID: <code>{}</code>\nActive: {}\nFilters: {}",
                html_escape(&name),
                group_id,
                if is_active { "yes ✅" } else { "no" },
                filter_count,
            );
            let _ = bot
                .edit_message_text(chat_id, message_id, text)
                .parse_mode(ParseMode::Html)
                .reply_markup(back_markup())
                .await;
            bot.answer_callback_query(&q.id).await?;
        }
        "disc" => {
            state.connections.disconnect(admin_id, group_id).await?;
            info!("Admin {} disconnected group {}", admin_id, group_id);
            let text = format!("🔌 Disconnected from <b>{}</b>.", html_escape(&name));
            let _ = bot
                .edit_message_text(chat_id, message_id, text)
                .parse_mode(ParseMode::Html)
                .reply_markup(back_markup())
                .await;
            bot.answer_callback_query(&q.id).text("Disconnected").await?;
        }
        _ => {
            bot.answer_callback_query(&q.id).await?;
        }
    }

    Ok(())
}

/// Render the connected-groups list with one button per group.
fn connections_view(conn: &GroupConnection) -> (String, InlineKeyboardMarkup) {
    let text = "📋 <b>Your connected groups</b>\nTap one to manage it:".to_string();

    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    for group in &conn.groups {
        let label = if conn.active_group == Some(group.id) {
            format!("✅ {}", group.name)
        } else {
            group.name.clone()
        };
        rows.push(vec![InlineKeyboardButton::callback(
            label,
            format!("conn:menu:{}", group.id),
        )]);
    }

    (text, InlineKeyboardMarkup::new(rows))
}

/// Per-group management menu.
fn group_menu(group_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "🎯 Set as active",
            format!("conn:set:{group_id}"),
        )],
        vec![InlineKeyboardButton::callback(
            "📊 Status",
            format!("conn:status:{group_id}"),
        )],
        vec![InlineKeyboardButton::callback(
            "🔌 Disconnect",
            format!("conn:disc:{group_id}"),
        )],
        vec![InlineKeyboardButton::callback("« Back", "conn:back")],
    ])
}

fn back_markup() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "« Back",
        "conn:back",
    )]])
}

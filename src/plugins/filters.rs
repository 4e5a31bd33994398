//! Filter management commands and the private-chat filter browser.
//!
//! Group members get a plain /filters listing; admins get a paginated
//! inline browser in private chat with view, delete and copy actions.
//! New filters arrive as photos with a `/filter "keyword"` caption.

use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, ParseMode, ReplyParameters,
};
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{FilterKind, FilterRecord, KnownGroup};
use crate::matching::{PER_PAGE, Page};
use crate::utils::markup;
use crate::utils::split::{MAX_MESSAGE_LEN, split_message};
use crate::utils::{NOTICE_TTL, build_keyboard, html_escape, reply_then_delete};

/// Handle /filters in any chat type.
pub async fn filters_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    if msg.chat.is_group() || msg.chat.is_supergroup() {
        return list_group_filters(&bot, &msg, &state).await;
    }
    if msg.chat.is_private() {
        return open_browser(&bot, &msg, &state).await;
    }

    bot.send_message(msg.chat.id, "⚠️ This chat type is not supported.")
        .await?;
    Ok(())
}

/// Handle /del <keyword>.
pub async fn del_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    let Some((_, group_id)) = private_admin_target(&bot, &msg, &state).await? else {
        return Ok(());
    };

    let keyword = unquote(&args);
    if keyword.is_empty() {
        bot.send_message(msg.chat.id, "⚠️ Usage: /del <keyword>")
            .await?;
        return Ok(());
    }

    if state.filters.delete(group_id, &keyword).await? {
        info!("Deleted filter '{}' from group {}", keyword, group_id);
        bot.send_message(msg.chat.id, format!("🗑 Deleted \"{keyword}\"."))
            .await?;
    } else {
        bot.send_message(
            msg.chat.id,
            format!("⚠️ No filter \"{keyword}\" in the active group."),
        )
        .await?;
    }
    Ok(())
}

/// Handle /delall: wipe every filter of the active group.
pub async fn delall_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let Some((_, group_id)) = private_admin_target(&bot, &msg, &state).await? else {
        return Ok(());
    };

    let removed = state.filters.delete_all(group_id).await?;
    info!("Removed {} filters from group {} via /delall", removed, group_id);
    bot.send_message(
        msg.chat.id,
        format!("🗑 Removed {removed} filters from the active group."),
    )
    .await?;
    Ok(())
}

/// Handle /view <keyword>: preview a filter exactly as the group sees it.
pub async fn view_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    let Some((_, group_id)) = private_admin_target(&bot, &msg, &state).await? else {
        return Ok(());
    };

    let keyword = unquote(&args);
    if keyword.is_empty() {
        bot.send_message(msg.chat.id, "⚠️ Usage: /view \"keyword\"")
            .await?;
        return Ok(());
    }

    match state.filters.get(group_id, &keyword).await? {
        Some(record) => send_record(&bot, msg.chat.id, &record, None).await?,
        None => {
            bot.send_message(
                msg.chat.id,
                format!("⚠️ No filter \"{keyword}\" in the active group."),
            )
            .await?;
        }
    }
    Ok(())
}

/// Save a photo filter from a private message with a `/filter` caption.
pub async fn save_photo_filter(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
) -> anyhow::Result<()> {
    let Some((_, group_id)) = private_admin_target(bot, msg, state).await? else {
        return Ok(());
    };

    let caption = msg.caption().unwrap_or("");
    let Some((keyword, body)) = markup::extract_filter_keyword(caption) else {
        bot.send_message(
            msg.chat.id,
            "⚠️ I couldn't find the keyword.\n\
             Caption format: <code>/filter \"keyword\" optional text</code>\n\
             Add buttons with <code>[Label](buttonurl:https://example.com)</code> lines.",
        )
        .parse_mode(ParseMode::Html)
        .await?;
        return Ok(());
    };

    // Telegram sends several sizes of the same photo; keep the largest.
    let Some(file_id) = msg
        .photo()
        .and_then(|sizes| sizes.iter().max_by_key(|p| p.width * p.height))
        .map(|p| p.file.id.clone())
    else {
        return Ok(());
    };

    let (body_text, buttons) = markup::parse_button_markup(&body);

    let mut record = FilterRecord::photo(group_id, &keyword, body_text, file_id);
    record.buttons = buttons;
    state.filters.upsert(&record).await?;

    info!("Saved photo filter '{}' for group {}", record.keyword, group_id);

    bot.send_message(
        msg.chat.id,
        format!("✅ Saved filter \"{}\" for the active group.", record.keyword),
    )
    .await?;
    Ok(())
}

/// Send a stored filter the way the group sees it.
pub async fn send_record(
    bot: &ThrottledBot,
    chat_id: ChatId,
    record: &FilterRecord,
    reply_to: Option<MessageId>,
) -> anyhow::Result<()> {
    let (text, rows) = markup::compose_reply(record);
    let keyboard = build_keyboard(&rows);

    match record.kind {
        FilterKind::Photo => {
            let Some(file_id) = record.media_ref.as_ref() else {
                return Ok(());
            };
            let mut req = bot.send_photo(chat_id, InputFile::file_id(file_id));
            if !text.is_empty() {
                req = req.caption(text);
            }
            if let Some(kb) = keyboard {
                req = req.reply_markup(kb);
            }
            if let Some(reply_to) = reply_to {
                req = req.reply_parameters(ReplyParameters::new(reply_to));
            }
            req.await?;
        }
        FilterKind::Text => {
            // A text filter with nothing but buttons still needs a body.
            let body = if text.is_empty() {
                format!("🎬 {}", record.keyword)
            } else {
                text
            };
            let mut req = bot.send_message(chat_id, body);
            if let Some(kb) = keyboard {
                req = req.reply_markup(kb);
            }
            if let Some(reply_to) = reply_to {
                req = req.reply_parameters(ReplyParameters::new(reply_to));
            }
            req.await?;
        }
    }

    Ok(())
}

/// Handle flt: callback buttons (filter browser).
pub async fn browser_callback(
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

    let rest = data.strip_prefix("flt:").unwrap_or_default();

    if rest == "close" {
        let _ = bot.delete_message(chat_id, message_id).await;
        bot.answer_callback_query(&q.id).await?;
        return Ok(());
    }

    let Some(group_id) = state.connections.active_group(admin_id).await? else {
        bot.answer_callback_query(&q.id)
            .text("⚠️ No active group. Use /connect first.")
            .show_alert(true)
            .await?;
        return Ok(());
    };

    if let Some(page) = rest.strip_prefix("page:") {
        let requested = page.parse().unwrap_or(1);
        let (text, keyboard) = browser_view(&state, admin_id, group_id, requested).await?;
        let _ = bot
            .edit_message_text(chat_id, message_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard)
            .await;
        bot.answer_callback_query(&q.id).await?;
    } else if let Some(keyword) = rest.strip_prefix("sel:") {
        let text = format!("🎞 <b>{}</b>\nChoose an action:", html_escape(keyword));
        let _ = bot
            .edit_message_text(chat_id, message_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(action_menu(keyword))
            .await;
        bot.answer_callback_query(&q.id).await?;
    } else if let Some(keyword) = rest.strip_prefix("view:") {
        match state.filters.get(group_id, keyword).await? {
            Some(record) => {
                send_record(&bot, chat_id, &record, None).await?;
                bot.answer_callback_query(&q.id).await?;
            }
            None => {
                bot.answer_callback_query(&q.id)
                    .text("⚠️ Filter not found; it may have been deleted.")
                    .show_alert(true)
                    .await?;
            }
        }
    } else if let Some(keyword) = rest.strip_prefix("delok:") {
        let deleted = state.filters.delete(group_id, keyword).await?;
        let text = if deleted {
            info!("Deleted filter '{}' from group {} via browser", keyword, group_id);
            format!("🗑 Deleted \"{}\".", html_escape(keyword))
        } else {
            "⚠️ Filter not found; nothing was deleted.".to_string()
        };
        let _ = bot
            .edit_message_text(chat_id, message_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(back_to_list())
            .await;
        bot.answer_callback_query(&q.id).await?;
    } else if let Some(keyword) = rest.strip_prefix("del:") {
        let text = format!(
            "⚠️ Delete <b>{}</b> from the active group?",
            html_escape(keyword)
        );
        let keyboard = InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::callback("✅ Yes, delete", format!("flt:delok:{keyword}")),
            InlineKeyboardButton::callback("❌ No", "flt:page:1"),
        ]]);
        let _ = bot
            .edit_message_text(chat_id, message_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard)
            .await;
        bot.answer_callback_query(&q.id).await?;
    } else if let Some(tail) = rest.strip_prefix("copyto:") {
        let Some((target, keyword)) = tail.split_once(':') else {
            bot.answer_callback_query(&q.id).await?;
            return Ok(());
        };
        let Ok(target_id) = target.parse::<i64>() else {
            bot.answer_callback_query(&q.id).await?;
            return Ok(());
        };

        match state.filters.get(group_id, keyword).await? {
            Some(record) => {
                let mut copy = record.without_id();
                copy.chat_id = target_id;
                state.filters.upsert(&copy).await?;

                let conn = state.connections.get(admin_id).await?;
                let target_name = conn
                    .as_ref()
                    .and_then(|c| c.group_name(target_id))
                    .unwrap_or("Unknown Group");
                info!("Copied filter '{}' from group {} to {}", keyword, group_id, target_id);

                let text = format!(
                    "✅ Copied \"{}\" to <b>{}</b>.",
                    html_escape(keyword),
                    html_escape(target_name)
                );
                let _ = bot
                    .edit_message_text(chat_id, message_id, text)
                    .parse_mode(ParseMode::Html)
                    .reply_markup(back_to_list())
                    .await;
                bot.answer_callback_query(&q.id).text("Copied").await?;
            }
            None => {
                bot.answer_callback_query(&q.id)
                    .text("⚠️ Filter not found; it may have been deleted.")
                    .show_alert(true)
                    .await?;
            }
        }
    } else if let Some(keyword) = rest.strip_prefix("copy:") {
        let conn = state.connections.get(admin_id).await?;
        let others: Vec<KnownGroup> = conn
            .map(|c| {
                c.groups
                    .into_iter()
                    .filter(|g| g.id != group_id)
                    .collect()
            })
            .unwrap_or_default();

        if others.is_empty() {
            bot.answer_callback_query(&q.id)
                .text("⚠️ Connect a second group first.")
                .show_alert(true)
                .await?;
            return Ok(());
        }

        let mut rows: Vec<Vec<InlineKeyboardButton>> = others
            .iter()
            .map(|g| {
                vec![InlineKeyboardButton::callback(
                    g.name.clone(),
                    format!("flt:copyto:{}:{}", g.id, keyword),
                )]
            })
            .collect();
        rows.push(vec![InlineKeyboardButton::callback(
            "« Back",
            format!("flt:sel:{keyword}"),
        )]);

        let text = format!("📤 Copy <b>{}</b> to which group?", html_escape(keyword));
        let _ = bot
            .edit_message_text(chat_id, message_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(InlineKeyboardMarkup::new(rows))
            .await;
        bot.answer_callback_query(&q.id).await?;
    } else {
        bot.answer_callback_query(&q.id).await?;
    }

    Ok(())
}

/// Plain numbered listing for group members.
async fn list_group_filters(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
) -> anyhow::Result<()> {
    let keywords = state.filters.keywords(msg.chat.id.0).await?;

    if keywords.is_empty() {
        reply_then_delete(
            bot,
            msg,
            "📭 No filters here yet.\nAsk for one with /request <movie name>!",
            NOTICE_TTL,
        );
        return Ok(());
    }

    let mut text = format!("🎬 <b>Filters in this group</b> ({}):\n", keywords.len());
    for (i, keyword) in keywords.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, html_escape(keyword)));
    }

    for chunk in split_message(&text, MAX_MESSAGE_LEN) {
        bot.send_message(msg.chat.id, chunk)
            .parse_mode(ParseMode::Html)
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
    }
    Ok(())
}

/// Open the paginated browser (admins, private chat).
async fn open_browser(bot: &ThrottledBot, msg: &Message, state: &AppState) -> anyhow::Result<()> {
    let Some((admin_id, group_id)) = private_admin_target(bot, msg, state).await? else {
        return Ok(());
    };

    let (text, keyboard) = browser_view(state, admin_id, group_id, 1).await?;
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

/// Build one page of the keyword browser.
async fn browser_view(
    state: &AppState,
    admin_id: i64,
    group_id: i64,
    requested_page: usize,
) -> anyhow::Result<(String, InlineKeyboardMarkup)> {
    let name = state
        .connections
        .get(admin_id)
        .await?
        .and_then(|c| c.group_name(group_id).map(|n| n.to_string()))
        .unwrap_or_else(|| "Unknown Group".to_string());

    let keywords = state.filters.keywords(group_id).await?;
    let page = Page::clamped(keywords.len(), requested_page, PER_PAGE);

    let text = if keywords.is_empty() {
        format!(
            "📭 No filters stored for <b>{}</b> yet.\n\
             Send a photo with caption <code>/filter \"keyword\" text</code> to add one.",
            html_escape(&name)
        )
    } else {
        format!(
            "🗂 Filters for <b>{}</b>, page {}/{} ({} total)\nTap a keyword:",
            html_escape(&name),
            page.number,
            page.total_pages,
            keywords.len()
        )
    };

    let mut rows: Vec<Vec<InlineKeyboardButton>> = keywords[page.start..page.end]
        .iter()
        .map(|kw| {
            vec![InlineKeyboardButton::callback(
                kw.clone(),
                format!("flt:sel:{kw}"),
            )]
        })
        .collect();

    let mut nav = Vec::new();
    if page.has_prev() {
        nav.push(InlineKeyboardButton::callback(
            "⬅️ Prev",
            format!("flt:page:{}", page.number - 1),
        ));
    }
    if page.has_next() {
        nav.push(InlineKeyboardButton::callback(
            "Next ➡️",
            format!("flt:page:{}", page.number + 1),
        ));
    }
    if !nav.is_empty() {
        rows.push(nav);
    }
    rows.push(vec![InlineKeyboardButton::callback("✖️ Close", "flt:close")]);

    Ok((text, InlineKeyboardMarkup::new(rows)))
}

/// Actions for one selected keyword.
fn action_menu(keyword: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "👁 View",
            format!("flt:view:{keyword}"),
        )],
        vec![InlineKeyboardButton::callback(
            "🗑 Delete",
            format!("flt:del:{keyword}"),
        )],
        vec![InlineKeyboardButton::callback(
            "📤 Copy to another group",
            format!("flt:copy:{keyword}"),
        )],
        vec![InlineKeyboardButton::callback(
            "« Back to list",
            "flt:page:1",
        )],
    ])
}

fn back_to_list() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "« Back to list",
        "flt:page:1",
    )]])
}

/// Resolve the caller's active group for private admin commands.
///
/// Returns `None` (after replying where appropriate) when the command
/// should not run: wrong chat type, non-admin, or no active group.
async fn private_admin_target(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
) -> anyhow::Result<Option<(i64, i64)>> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(None);
    };
    if !msg.chat.is_private() || !state.is_admin(user.id) {
        return Ok(None);
    }

    let admin_id = user.id.0 as i64;
    match state.connections.active_group(admin_id).await? {
        Some(group_id) => Ok(Some((admin_id, group_id))),
        None => {
            bot.send_message(
                msg.chat.id,
                "⚠️ No active group.\nUse /connect <group_id> first.",
            )
            .await?;
            Ok(None)
        }
    }
}

/// Strip one pair of surrounding double quotes, then lowercase.
fn unquote(args: &str) -> String {
    let trimmed = args.trim();
    let trimmed = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed);
    trimmed.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_strips_quotes_and_lowercases() {
        assert_eq!(unquote("\"Alpha\""), "alpha");
        assert_eq!(unquote("  Alpha  "), "alpha");
        assert_eq!(unquote(" \"spaced name\" "), "spaced name");
    }

    #[test]
    fn unquote_keeps_unpaired_quote() {
        assert_eq!(unquote("\"alpha"), "\"alpha");
        assert_eq!(unquote(""), "");
    }
}

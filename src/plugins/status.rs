//! /status command plugin: storage stats and maintenance actions.
//!
//! Backup exports the active group's filters as a JSON document; import
//! reads one back into the active group. Import and clear are two-step
//! flows armed from the inline menu and tracked per admin in
//! [`crate::session::SessionTracker`].

use futures::TryStreamExt;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode};
use thiserror::Error;
use tracing::{info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::FilterRecord;
use crate::session::AdminStage;

/// Errors surfaced to the admin when an import fails.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not download the file: {0}")]
    Download(#[from] teloxide::RequestError),
    #[error("not a valid filter backup: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("database write failed: {0}")]
    Store(String),
}

/// Handle /status.
pub async fn status_command(
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

    let storage_mb = state.db.storage_size_bytes().await? / 1024.0 / 1024.0;
    let total = state.filters.count_all().await?;
    let groups = state.filters.distinct_chats().await?.len();

    let text = format!(
        "📊 <b>Bot Status</b>\n\n\
         💾 Storage used: {storage_mb:.2} MB\n\
         🎬 Filters stored: {total}\n\
         👥 Groups with filters: {groups}"
    );

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(status_menu())
        .await?;

    Ok(())
}

/// Handle st: callback buttons (maintenance menu).
pub async fn status_callback(
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

    match data.as_str() {
        "st:close" => {
            let _ = bot.delete_message(chat_id, message_id).await;
            bot.answer_callback_query(&q.id).await?;
        }
        "st:backup" => {
            let Some(group_id) = state.connections.active_group(admin_id).await? else {
                return no_active_group(&bot, &q).await;
            };

            let records: Vec<FilterRecord> = state
                .filters
                .all(group_id)
                .await?
                .into_iter()
                .map(FilterRecord::without_id)
                .collect();
            let count = records.len();
            let json = serde_json::to_vec_pretty(&records)?;

            let file = InputFile::memory(json).file_name(format!("filters_{group_id}.json"));
            bot.send_document(chat_id, file)
                .caption(format!("💾 Backup of the active group ({count} filters)"))
                .await?;

            info!("Sent backup of {} filters for group {}", count, group_id);
            bot.answer_callback_query(&q.id).await?;
        }
        "st:import" => {
            if state.connections.active_group(admin_id).await?.is_none() {
                return no_active_group(&bot, &q).await;
            }

            state.sessions.set(q.from.id.0, AdminStage::AwaitingImportFile);
            bot.send_message(chat_id, "📥 Send me the backup JSON file now.")
                .await?;
            bot.answer_callback_query(&q.id).await?;
        }
        "st:clear" => {
            if state.clear_password.is_none() {
                bot.answer_callback_query(&q.id)
                    .text("🚫 Clear is disabled: no password configured.")
                    .show_alert(true)
                    .await?;
                return Ok(());
            }
            if state.connections.active_group(admin_id).await?.is_none() {
                return no_active_group(&bot, &q).await;
            }

            state.sessions.set(q.from.id.0, AdminStage::AwaitingClearPassword);
            bot.send_message(
                chat_id,
                "⚠️ This deletes EVERY filter of the active group.\nSend the password to confirm.",
            )
            .await?;
            bot.answer_callback_query(&q.id).await?;
        }
        _ => {
            bot.answer_callback_query(&q.id).await?;
        }
    }

    Ok(())
}

/// Consume a document sent while an import is pending.
pub async fn handle_pending_document(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    if !state.is_admin(user.id) {
        return Ok(());
    }
    if state.sessions.get(user.id.0) != Some(AdminStage::AwaitingImportFile) {
        bot.send_message(
            msg.chat.id,
            "ℹ️ No import pending. Start one from /status first.",
        )
        .await?;
        return Ok(());
    }
    // One shot: the stage is spent whether the import succeeds or not.
    state.sessions.take(user.id.0);

    let Some(doc) = msg.document() else {
        return Ok(());
    };

    let Some(group_id) = state.connections.active_group(user.id.0 as i64).await? else {
        bot.send_message(msg.chat.id, "⚠️ No active group anymore; import cancelled.")
            .await?;
        return Ok(());
    };

    match run_import(bot, state, group_id, &doc.file.id).await {
        Ok(count) => {
            info!("Imported {} filters into group {}", count, group_id);
            bot.send_message(
                msg.chat.id,
                format!("✅ Imported {count} filters into the active group."),
            )
            .await?;
        }
        Err(e) => {
            warn!("Import for group {} failed: {}", group_id, e);
            bot.send_message(msg.chat.id, format!("❌ Import failed: {e}"))
                .await?;
        }
    }

    Ok(())
}

/// Consume a private text while a clear-confirmation is pending.
pub async fn handle_pending_text(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    if !state.is_admin(user.id) {
        return Ok(());
    }
    let Some(text) = msg.text() else {
        return Ok(());
    };

    if state.sessions.get(user.id.0) != Some(AdminStage::AwaitingClearPassword) {
        // Common slip: sending /filter as plain text instead of a photo caption.
        if text.trim_start().starts_with("/filter") {
            bot.send_message(
                msg.chat.id,
                "⚠️ Filters need a photo.\nSend one with the caption <code>/filter \"keyword\" text</code>.",
            )
            .parse_mode(ParseMode::Html)
            .await?;
        }
        return Ok(());
    }
    // Any reply settles the confirmation, right or wrong.
    state.sessions.take(user.id.0);

    let Some(group_id) = state.connections.active_group(user.id.0 as i64).await? else {
        bot.send_message(msg.chat.id, "⚠️ No active group anymore; clear cancelled.")
            .await?;
        return Ok(());
    };

    let matches = state
        .clear_password
        .as_deref()
        .is_some_and(|password| text == password);
    if !matches {
        bot.send_message(msg.chat.id, "❌ Wrong password. Nothing was deleted.")
            .await?;
        return Ok(());
    }

    let removed = state.filters.delete_all(group_id).await?;
    info!("Cleared {} filters from group {} after password confirmation", removed, group_id);
    bot.send_message(
        msg.chat.id,
        format!("🧹 Removed {removed} filters from the active group."),
    )
    .await?;

    Ok(())
}

/// Download, parse and store a backup file.
async fn run_import(
    bot: &ThrottledBot,
    state: &AppState,
    group_id: i64,
    file_id: &str,
) -> Result<u64, ImportError> {
    let data = download_to_vec(bot, file_id).await?;
    let records: Vec<FilterRecord> = serde_json::from_slice(&data)?;

    let mut imported = 0u64;
    for mut record in records {
        if record.keyword.trim().is_empty() {
            continue;
        }
        record.id = None;
        record.chat_id = group_id;
        record.keyword = record.keyword.to_lowercase();

        state
            .filters
            .upsert(&record)
            .await
            .map_err(|e| ImportError::Store(e.to_string()))?;
        imported += 1;
    }

    Ok(imported)
}

/// Fetch a Telegram file into memory.
async fn download_to_vec(
    bot: &ThrottledBot,
    file_id: &str,
) -> Result<Vec<u8>, teloxide::RequestError> {
    let file = bot.get_file(file_id).await?;

    let mut data = Vec::with_capacity(file.size as usize);
    let mut stream = bot.inner().download_file_stream(&file.path);
    while let Some(bytes) = stream.try_next().await? {
        data.extend_from_slice(&bytes);
    }

    Ok(data)
}

fn status_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("💾 Backup", "st:backup"),
            InlineKeyboardButton::callback("📥 Import", "st:import"),
        ],
        vec![InlineKeyboardButton::callback(
            "🧹 Clear all filters",
            "st:clear",
        )],
        vec![InlineKeyboardButton::callback("✖️ Close", "st:close")],
    ])
}

async fn no_active_group(bot: &ThrottledBot, q: &CallbackQuery) -> anyhow::Result<()> {
    bot.answer_callback_query(&q.id)
        .text("⚠️ No active group. Use /connect first.")
        .show_alert(true)
        .await?;
    Ok(())
}

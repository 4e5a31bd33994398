//! Event handler system.
//!
//! Non-command messages land here: group text runs the fuzzy lookup,
//! private messages feed the admin flows (photo filters, pending
//! imports and clear confirmations).

pub mod lookup;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::error;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::plugins::{filters, status};

/// Build the message event handler.
pub fn message_event_handler() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(
            dptree::filter(|msg: Message| msg.chat.is_group() || msg.chat.is_supergroup())
                .endpoint(group_message_handler),
        )
        .branch(
            dptree::filter(|msg: Message| msg.chat.is_private())
                .endpoint(private_message_handler),
        )
}

/// Run the fuzzy lookup for plain group text.
async fn group_message_handler(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let text = msg.text().unwrap_or("");
    if text.is_empty() || text.starts_with('/') {
        return Ok(());
    }

    if let Err(e) = lookup::check_message(&bot, &msg, &state).await {
        error!("Lookup error in {}: {}", msg.chat.id, e);
    }

    Ok(())
}

/// Route private non-command messages to the admin flows.
///
/// Each sub-handler runs independently; a failure in one is logged and
/// never takes the dispatcher down.
async fn private_message_handler(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let has_filter_caption = msg.photo().is_some()
        && msg
            .caption()
            .map(|c| c.trim_start().starts_with("/filter"))
            .unwrap_or(false);

    if has_filter_caption {
        if let Err(e) = filters::save_photo_filter(&bot, &msg, &state).await {
            error!("Photo filter error: {}", e);
        }
    } else if msg.document().is_some() {
        if let Err(e) = status::handle_pending_document(&bot, &msg, &state).await {
            error!("Import intake error: {}", e);
        }
    } else if msg.text().is_some() {
        if let Err(e) = status::handle_pending_text(&bot, &msg, &state).await {
            error!("Private text error: {}", e);
        }
    }

    Ok(())
}

//! Plugin system for command handlers.
//!
//! Add new plugins by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Adding the handler to `command_handler()`

pub mod connect;
pub mod filters;
pub mod request;
pub mod start;
pub mod status;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

/// All bot commands.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,

    // Connection commands (private chat)
    #[command(description = "Connect a group by its ID")]
    Connect(String),

    #[command(description = "List and manage connected groups")]
    Connections,

    // Filter commands
    #[command(description = "List filters (browse them in private chat)")]
    Filters,

    #[command(description = "Delete a filter from the active group")]
    Del(String),

    #[command(description = "Delete every filter of the active group")]
    Delall,

    #[command(description = "Preview a stored filter")]
    View(String),

    // Misc
    #[command(description = "Request a movie that is missing")]
    Request(String),

    #[command(description = "Storage stats and maintenance menu")]
    Status,
}

/// Build the combined command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(start::start_command))
        // Connections
        .branch(case![Command::Connect(args)].endpoint(connect::connect_command))
        .branch(case![Command::Connections].endpoint(connect::connections_command))
        // Filters
        .branch(case![Command::Filters].endpoint(filters::filters_command))
        .branch(case![Command::Del(args)].endpoint(filters::del_command))
        .branch(case![Command::Delall].endpoint(filters::delall_command))
        .branch(case![Command::View(args)].endpoint(filters::view_command))
        // Misc
        .branch(case![Command::Request(args)].endpoint(request::request_command))
        .branch(case![Command::Status].endpoint(status::status_command))
}

/// Build the callback query handler.
pub fn callback_handler() -> UpdateHandler<anyhow::Error> {
    Update::filter_callback_query()
        .branch(
            dptree::filter(|q: CallbackQuery| {
                q.data.as_ref().map(|d| d.starts_with("conn:")).unwrap_or(false)
            })
            .endpoint(connect::connection_callback),
        )
        .branch(
            dptree::filter(|q: CallbackQuery| {
                q.data.as_ref().map(|d| d.starts_with("flt:")).unwrap_or(false)
            })
            .endpoint(filters::browser_callback),
        )
        .branch(
            dptree::filter(|q: CallbackQuery| {
                q.data.as_ref().map(|d| d.starts_with("st:")).unwrap_or(false)
            })
            .endpoint(status::status_callback),
        )
}

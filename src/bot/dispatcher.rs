//! Message dispatcher setup.
//!
//! Builds the dispatcher with all command handlers and event handlers.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::database::{ConnectionRepository, Database, FilterRepository, RequestRepository};
use crate::events;
use crate::plugins;
use crate::session::SessionTracker;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Arc<Database>,

    /// Filter repository.
    pub filters: Arc<FilterRepository>,

    /// Group connection repository.
    pub connections: Arc<ConnectionRepository>,

    /// Movie request repository.
    pub requests: Arc<RequestRepository>,

    /// Per-admin conversation stages (pending imports and clear confirmations).
    pub sessions: SessionTracker,

    /// User IDs allowed to manage filters.
    pub admin_ids: Vec<u64>,

    /// Password guarding the clear-all action; `None` disables it.
    pub clear_password: Option<String>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Arc<Database>, admin_ids: Vec<u64>, clear_password: Option<String>) -> Self {
        let filters = Arc::new(FilterRepository::new(&db));
        let connections = Arc::new(ConnectionRepository::new(&db));
        let requests = Arc::new(RequestRepository::new(&db));

        Self {
            db,
            filters,
            connections,
            requests,
            sessions: SessionTracker::new(),
            admin_ids,
            clear_password,
        }
    }

    /// Check whether a user may manage filters.
    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.admin_ids.contains(&user_id.0)
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(
    bot: ThrottledBot,
    db: Arc<Database>,
    admin_ids: Vec<u64>,
    clear_password: Option<String>,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    let state = AppState::new(db, admin_ids, clear_password);

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    use teloxide::dispatching::UpdateFilterExt;

    // Commands first; everything else falls through to the lookup and
    // private intake handlers.
    let message_handler = Update::filter_message()
        .branch(plugins::command_handler())
        .branch(events::message_event_handler());

    dptree::entry()
        .branch(message_handler)
        .branch(plugins::callback_handler())
}

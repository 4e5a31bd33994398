//! ScenesPacks - Telegram scenepack filter bot.
//!
//! Group members type a movie name and the bot replies with the stored
//! scene pack; admins manage everything from private chat.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - MongoDB integration (filters, connections, requests)
//! - `cache` - LRU-based caching with Moka
//! - `matching` - Fuzzy keyword matching and pagination
//! - `session` - Per-admin conversation stages
//! - `bot` - Dispatcher, polling/webhook runtime, keepalive
//! - `plugins` - Command handlers
//! - `events` - Group lookup and private intake handlers
//! - `utils` - Button markup, message splitting, small helpers

mod bot;
mod cache;
mod config;
mod database;
mod events;
mod matching;
mod plugins;
mod session;
mod utils;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use database::Database;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scenepacks=info,teloxide=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting ScenesPacks bot...");

    let config = Config::from_env();
    info!("Configuration loaded");
    info!("Bot mode: {:?}", config.bot_mode);

    if config.admin_ids.is_empty() {
        info!("No admin IDs configured (ADMIN_IDS is empty)");
    } else {
        info!("Bot admins: {:?}", config.admin_ids);
    }

    info!("Connecting to MongoDB...");
    let db = Database::connect(&config.mongodb_uri, &config.mongodb_database).await?;
    let db = Arc::new(db);

    // Throttle keeps us inside Telegram's per-chat and global rate limits.
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());

    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    let dispatcher = bot::build_dispatcher(
        bot.clone(),
        db,
        config.admin_ids.clone(),
        config.clear_password.clone(),
    );

    bot::run(&config, dispatcher, bot).await;

    Ok(())
}

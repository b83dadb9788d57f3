//! Okiru - Group wake-up accountability bot.
//!
//! Members declare a personal wake-up time, report waking up, and a daily
//! aggregation decides whether the group's shared streak continues or resets.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - MongoDB integration (users, groups, memberships)
//! - `cache` - LRU-based caching with Moka
//! - `clock` - Calendar-day and week-boundary math in an explicit timezone
//! - `bot` - Core bot functionality (with Throttle for API rate limiting)
//! - `plugins` - Command handlers
//! - `events` - Join / member-joined handlers
//! - `aggregate` - Daily group aggregation + cron scheduler
//! - `i18n` - Message catalog with placeholder filling
//! - `utils` - Command classification and formatting helpers

mod aggregate;
mod bot;
mod cache;
mod clock;
mod config;
mod database;
mod error;
mod events;
mod i18n;
mod plugins;
mod utils;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use database::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // Initialize logging with sensible defaults
    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("okiru=info,teloxide=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Okiru bot...");

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}", config.bot_mode);
    info!("Timezone: {}", config.timezone);

    // Load the embedded message catalog
    i18n::init();

    // Connect to MongoDB
    info!("Connecting to MongoDB...");
    let db = Database::connect(&config.mongodb_uri, &config.mongodb_database).await?;
    let db = Arc::new(db);
    info!("Database connected");

    // Initialize bot with Throttle for automatic rate limiting
    // This respects Telegram's rate limits:
    // - 30 messages per second globally
    // - 1 message per second to the same chat
    // - 20 messages per minute to the same group
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());
    info!("Bot initialized with rate limiting (Throttle)");

    // Get bot info
    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    // Build dispatcher
    let (dispatcher, state) = bot::build_dispatcher(bot.clone(), db, &config);

    // Spawn the daily aggregation schedule
    aggregate::scheduler::spawn(bot.clone(), state, config.aggregate_schedule.clone());
    info!("Daily aggregation scheduled: {}", config.aggregate_cron);

    // Run the bot
    bot::run(&config, dispatcher, bot).await;

    Ok(())
}

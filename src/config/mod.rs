//! Configuration module for the Okiru bot.
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;

use chrono_tz::Tz;
use cron::Schedule;
use serde::Deserialize;

/// Bot running mode
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<String>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    // MongoDB
    pub mongodb_uri: String,
    pub mongodb_database: String,

    /// Timezone all calendar-day and week computations run in.
    pub timezone: Tz,

    /// Cron expression for the daily aggregation run.
    pub aggregate_cron: String,

    /// Parsed aggregation schedule.
    pub aggregate_schedule: Schedule,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if required environment variables are not set or malformed.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let bot_mode = env::var("BOT_MODE")
            .unwrap_or_else(|_| "polling".to_string())
            .to_lowercase();

        let bot_mode = match bot_mode.as_str() {
            "webhook" => BotMode::Webhook,
            _ => BotMode::Polling,
        };

        let webhook_url = env::var("WEBHOOK_URL").ok();

        // Validate webhook URL is set if mode is webhook
        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            panic!("WEBHOOK_URL must be set when BOT_MODE is webhook");
        }

        let webhook_port = env::var("WEBHOOK_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8443);

        let webhook_secret = env::var("WEBHOOK_SECRET").ok().filter(|s| !s.is_empty());

        let timezone: Tz = env::var("TIMEZONE")
            .unwrap_or_else(|_| "Asia/Tokyo".to_string())
            .parse()
            .expect("TIMEZONE must be a valid IANA timezone name");

        // Six-field cron (sec min hour dom month dow); default is noon local time
        let aggregate_cron =
            env::var("AGGREGATE_CRON").unwrap_or_else(|_| "0 0 12 * * *".to_string());
        let aggregate_schedule = Schedule::from_str(&aggregate_cron)
            .expect("AGGREGATE_CRON must be a valid cron expression");

        Self {
            bot_token: env::var("BOT_TOKEN").expect("BOT_TOKEN must be set"),
            bot_mode,
            webhook_url,
            webhook_port,
            webhook_secret,
            mongodb_uri: env::var("MONGODB_URI").expect("MONGODB_URI must be set"),
            mongodb_database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "okiru".to_string()),
            timezone,
            aggregate_cron,
            aggregate_schedule,
        }
    }
}

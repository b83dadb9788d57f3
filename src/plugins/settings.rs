//! Personal settings check handler.

use teloxide::prelude::*;
use teloxide::types::User;

use crate::bot::dispatcher::{AppState, WakeBot};
use crate::i18n;
use crate::utils::pad_minutes;

/// Handle "設定確認" - show the user's configured wake-up time.
pub async fn handle(
    bot: &WakeBot,
    msg: &Message,
    state: &AppState,
    user: &User,
) -> anyhow::Result<()> {
    let record = state.users.get(user.id.0).await?;

    let (hour, minute) = match record.as_ref().and_then(|r| r.wakeup_hour.zip(r.wakeup_minute)) {
        Some(hm) => hm,
        None => {
            return super::reply(bot, msg, i18n::text("wakeup.no_time_set")).await;
        }
    };

    let display_name = record
        .map(|r| r.display_name)
        .unwrap_or_else(|| user.full_name());

    let text = i18n::render(
        "settings.current",
        &[
            ("userName", &display_name),
            ("hours", &hour.to_string()),
            ("minutes", &pad_minutes(minute)),
        ],
    );
    super::reply(bot, msg, text).await
}

//! Wake report handler.

use teloxide::prelude::*;
use teloxide::types::User;
use tracing::info;

use crate::bot::dispatcher::{AppState, WakeBot};
use crate::error::Conflict;
use crate::i18n;

/// Handle a wake report ("起きた", "おはよう", ...).
///
/// The guard on the loaded record picks the reply; the conditional write is
/// what actually decides. When two reports race, the loser observes a `None`
/// from the store and gets the already-reported reply.
pub async fn handle(
    bot: &WakeBot,
    msg: &Message,
    state: &AppState,
    user: &User,
    now: i64,
) -> anyhow::Result<()> {
    let Some(record) = state.users.get(user.id.0).await? else {
        return Ok(());
    };

    if let Some(conflict) = record.report_conflict(&state.clock, now) {
        return super::reply(bot, msg, i18n::text(conflict.text_key())).await;
    }

    let day_key = state.clock.day_key(now);
    match state.users.try_record_report(user.id.0, now, &day_key).await? {
        Some(updated) => {
            info!("User {} reported wake-up on {}", user.id, day_key);
            let text = i18n::render("wakeup.success", &[("userName", &updated.display_name)]);
            super::reply(bot, msg, text).await
        }
        None => {
            super::reply(
                bot,
                msg,
                i18n::text(Conflict::AlreadyReportedToday.text_key()),
            )
            .await
        }
    }
}

//! Good-sleep (weekly pass) handlers.

use teloxide::prelude::*;
use teloxide::types::User;
use tracing::info;

use crate::bot::dispatcher::{AppState, WakeBot};
use crate::error::Conflict;
use crate::i18n;

/// Declare tomorrow's pass ("ぐっすり").
///
/// The deadline check uses the local clock hour; the weekly allowance is
/// enforced by the conditional write, so concurrent declares cannot spend
/// the pass twice.
pub async fn declare(
    bot: &WakeBot,
    msg: &Message,
    state: &AppState,
    user: &User,
    now: i64,
) -> anyhow::Result<()> {
    let Some(record) = state.users.get(user.id.0).await? else {
        return Ok(());
    };

    let (local_hour, _) = state.clock.local_clock(now);
    if let Some(conflict) = record.declare_conflict(local_hour) {
        return super::reply(bot, msg, i18n::text(conflict.text_key())).await;
    }

    match state.users.try_declare_joker(user.id.0, now).await? {
        Some(updated) => {
            info!("User {} declared good-sleep pass", user.id);
            let text = i18n::render("joker.declared", &[("userName", &updated.display_name)]);
            super::reply(bot, msg, text).await
        }
        None => {
            super::reply(bot, msg, i18n::text(Conflict::WeeklyLimitReached.text_key())).await
        }
    }
}

/// Take the declaration back ("ぐっすり取消").
pub async fn cancel(
    bot: &WakeBot,
    msg: &Message,
    state: &AppState,
    user: &User,
    now: i64,
) -> anyhow::Result<()> {
    let Some(record) = state.users.get(user.id.0).await? else {
        return Ok(());
    };

    if let Some(conflict) = record.cancel_conflict() {
        return super::reply(bot, msg, i18n::text(conflict.text_key())).await;
    }

    match state.users.try_cancel_joker(user.id.0, now).await? {
        Some(updated) => {
            info!("User {} cancelled good-sleep pass", user.id);
            let text = i18n::render("joker.cancelled", &[("userName", &updated.display_name)]);
            super::reply(bot, msg, text).await
        }
        None => super::reply(bot, msg, i18n::text(Conflict::JokerNotUsed.text_key())).await,
    }
}

//! Command handlers.
//!
//! Inbound text is classified into an [`Intent`](crate::utils::Intent) and
//! dispatched with an exhaustive `match`; each intent has its own module.
//! User-correctable conflicts become replies here; store or Telegram
//! failures propagate to the dispatcher, which logs them (no reply is sent
//! for those).

pub mod good_sleep;
pub mod help;
pub mod record;
pub mod report;
pub mod settings;
pub mod wakeup_time;

use teloxide::prelude::*;
use teloxide::types::ReplyParameters;

use crate::bot::dispatcher::{AppState, WakeBot};
use crate::i18n;
use crate::utils::{classify, Intent};

/// Unified text-message handler.
///
/// Before any command runs: the user record is upserted (display name
/// refresh), group and membership are lazily created for group chats, and
/// the week window is rolled over if stale.
pub async fn handle_message(bot: WakeBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user) = msg.from.clone() else {
        return Ok(());
    };
    if user.is_bot {
        return Ok(());
    }
    let Some(text) = msg.text().map(|t| t.to_string()) else {
        return Ok(());
    };

    let now = state.clock.now();
    let week_start = state.clock.week_start_key(now);

    let record = state.users.ensure(&user, &week_start, now).await?;

    if msg.chat.is_group() || msg.chat.is_supergroup() {
        state.groups.ensure(msg.chat.id.0, msg.chat.title()).await?;
        state.members.ensure(msg.chat.id.0, user.id.0, now).await?;
    }

    // Week rollover precedes every command. The loaded record can only be
    // stale towards the past, so a skipped write here is always safe.
    if record.needs_week_rollover(&week_start) {
        state.users.apply_week_rollover(user.id.0, &week_start).await?;
    }

    match classify(&text, &state.keywords) {
        Intent::SetWakeupTime { hour, minute } => {
            wakeup_time::handle(&bot, &msg, &state, &user, hour, minute, now).await
        }
        Intent::WakeupReport => report::handle(&bot, &msg, &state, &user, now).await,
        Intent::GoodSleepDeclare => good_sleep::declare(&bot, &msg, &state, &user, now).await,
        Intent::GoodSleepCancel => good_sleep::cancel(&bot, &msg, &state, &user, now).await,
        Intent::RecordCheck => record::handle(&bot, &msg, &state).await,
        Intent::SettingsCheck => settings::handle(&bot, &msg, &state, &user).await,
        Intent::Help => help::handle(&bot, &msg).await,
        Intent::Unknown => reply(&bot, &msg, i18n::text("general.unknown")).await,
    }
}

/// Reply to the triggering message.
pub(crate) async fn reply(bot: &WakeBot, msg: &Message, text: String) -> anyhow::Result<()> {
    bot.send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

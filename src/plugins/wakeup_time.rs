//! Wake-up time configuration handler.

use teloxide::prelude::*;
use teloxide::types::User;
use tracing::info;

use crate::bot::dispatcher::{AppState, WakeBot};
use crate::database::validate_wakeup_time;
use crate::i18n;
use crate::utils::pad_minutes;

/// Handle a "H時に起きる" / "H:Mに起きる" declaration.
///
/// The parser extracts whatever digits it saw; the range check happens here
/// so an out-of-range time answers with the format error and mutates nothing.
pub async fn handle(
    bot: &WakeBot,
    msg: &Message,
    state: &AppState,
    user: &User,
    hour: u32,
    minute: u32,
    now: i64,
) -> anyhow::Result<()> {
    let (hour, minute) = match validate_wakeup_time(hour, minute) {
        Ok(hm) => hm,
        Err(conflict) => {
            return super::reply(bot, msg, i18n::text(conflict.text_key())).await;
        }
    };

    state
        .users
        .set_wakeup_time(user.id.0, hour, minute, now)
        .await?;

    info!("User {} set wake-up time {}:{:02}", user.id, hour, minute);

    let text = i18n::render(
        "time.set_success",
        &[
            ("hours", &hour.to_string()),
            ("minutes", &pad_minutes(minute)),
        ],
    );
    super::reply(bot, msg, text).await
}

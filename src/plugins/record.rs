//! Group streak check handler.

use teloxide::prelude::*;

use crate::bot::dispatcher::{AppState, WakeBot};
use crate::i18n;

/// Handle "記録確認" - show the group's current and best streak.
///
/// Only meaningful in a group chat; in private chat the user gets the
/// group-only notice.
pub async fn handle(bot: &WakeBot, msg: &Message, state: &AppState) -> anyhow::Result<()> {
    if !msg.chat.is_group() && !msg.chat.is_supergroup() {
        return super::reply(bot, msg, i18n::text("record.group_only")).await;
    }

    let group = match state.groups.get(msg.chat.id.0).await? {
        Some(g) => g,
        None => state.groups.ensure(msg.chat.id.0, msg.chat.title()).await?,
    };

    let text = i18n::render(
        "record.status",
        &[
            ("streak", &group.current_streak.to_string()),
            ("best", &group.best_streak.to_string()),
        ],
    );
    super::reply(bot, msg, text).await
}

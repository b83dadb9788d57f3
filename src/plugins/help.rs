//! Help command handler.

use teloxide::prelude::*;

use crate::bot::dispatcher::WakeBot;
use crate::i18n;

/// Handle "使い方" / "ヘルプ" / "help".
pub async fn handle(bot: &WakeBot, msg: &Message) -> anyhow::Result<()> {
    super::reply(bot, msg, i18n::text("general.help")).await
}

//! Welcome event handlers.
//!
//! The pitch message is sent both when the bot itself is added to a group
//! and when new members join one.

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::ChatMemberUpdated;
use tracing::{debug, info};

use crate::bot::dispatcher::WakeBot;
use crate::i18n;

/// Handler for new members joining a group the bot is in.
pub fn member_joined_handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(|msg: Message| {
        msg.new_chat_members()
            .is_some_and(|users| users.iter().any(|u| !u.is_bot))
    })
    .endpoint(member_joined)
}

/// Handler for the bot being added to a group.
pub fn bot_joined_handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(is_join).endpoint(bot_joined)
}

fn is_join(update: ChatMemberUpdated) -> bool {
    !update.old_chat_member.is_present() && update.new_chat_member.is_present()
}

async fn member_joined(bot: WakeBot, msg: Message) -> anyhow::Result<()> {
    debug!("New members joined chat {}", msg.chat.id);
    bot.send_message(msg.chat.id, i18n::text("general.welcome"))
        .await?;
    Ok(())
}

async fn bot_joined(bot: WakeBot, update: ChatMemberUpdated) -> anyhow::Result<()> {
    info!("Bot added to chat {}", update.chat.id);
    bot.send_message(update.chat.id, i18n::text("general.welcome"))
        .await?;
    Ok(())
}

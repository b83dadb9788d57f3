//! Message dispatcher setup.
//!
//! Builds the dispatcher with the command and event handlers.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::clock::DayClock;
use crate::config::Config;
use crate::database::{Database, GroupRepo, MemberRepo, UserRepo};
use crate::events;
use crate::plugins;
use crate::utils::Keywords;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type WakeBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Per-member wake-up state.
    pub users: Arc<UserRepo>,

    /// Group streak records.
    pub groups: Arc<GroupRepo>,

    /// User-group membership links.
    pub members: Arc<MemberRepo>,

    /// Calendar-day and week-boundary math in the configured timezone.
    pub clock: DayClock,

    /// Command keyword tables, built once and never mutated.
    pub keywords: Arc<Keywords>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Arc<Database>, config: &Config) -> Self {
        let users = Arc::new(UserRepo::new(&db));
        let groups = Arc::new(GroupRepo::new(&db));
        let members = Arc::new(MemberRepo::new(&db));

        Self {
            users,
            groups,
            members,
            clock: DayClock::new(config.timezone),
            keywords: Arc::new(Keywords::default()),
        }
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(
    bot: WakeBot,
    db: Arc<Database>,
    config: &Config,
) -> (
    Dispatcher<WakeBot, anyhow::Error, teloxide::dispatching::DefaultKey>,
    AppState,
) {
    let state = AppState::new(db, config);

    let dispatcher = Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state.clone()])
        .enable_ctrlc_handler()
        .build();

    (dispatcher, state)
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    use teloxide::dispatching::UpdateFilterExt;

    // Messages: member-joined welcome first, then free-text commands
    let message_handler = Update::filter_message()
        .branch(events::member_joined_handler())
        .branch(
            dptree::filter(|msg: Message| msg.text().is_some() && msg.from.is_some())
                .endpoint(plugins::handle_message),
        );

    // Bot added to a group
    let joined_handler = Update::filter_my_chat_member().branch(events::bot_joined_handler());

    dptree::entry()
        .branch(message_handler)
        .branch(joined_handler)
}

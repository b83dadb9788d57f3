//! Group membership link.

use serde::{Deserialize, Serialize};

/// Many-to-many link between users and groups, created lazily on the first
/// interaction seen in a group and never deleted by the bot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupMember {
    pub chat_id: i64,
    pub user_id: u64,
    /// Unix timestamp of first sighting.
    pub joined_at: i64,
}

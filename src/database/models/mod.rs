//! Data models.

mod group;
mod membership;
mod user;

pub use group::WakeGroup;
pub use membership::GroupMember;
pub use user::{validate_wakeup_time, WakeUser, JOKER_CUTOFF_HOUR, WEEKLY_JOKER_LIMIT};

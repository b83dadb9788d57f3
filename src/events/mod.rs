//! Event handlers (join / member-joined).

mod welcome;

pub use welcome::{bot_joined_handler, member_joined_handler};

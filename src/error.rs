//! User-correctable error taxonomy.
//!
//! These are the conflicts a command can hit that the user themself can fix;
//! every one of them is converted into a reply and never escalates. Store or
//! Telegram failures stay `anyhow::Error` and abort only the current event.

use thiserror::Error;

/// A command was understood but cannot be applied in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Conflict {
    #[error("wake-up time out of range")]
    InvalidTime,

    #[error("already reported today")]
    AlreadyReportedToday,

    #[error("no wake-up time configured")]
    NoWakeupTimeSet,

    #[error("good-sleep declared past the daily cutoff")]
    PastDeadline,

    #[error("weekly good-sleep allowance exhausted")]
    WeeklyLimitReached,

    #[error("no good-sleep declaration to cancel")]
    JokerNotUsed,
}

impl Conflict {
    /// Message catalog key for the reply this conflict produces.
    pub fn text_key(&self) -> &'static str {
        match self {
            Conflict::InvalidTime => "time.format_error",
            Conflict::AlreadyReportedToday => "wakeup.already_reported",
            Conflict::NoWakeupTimeSet => "wakeup.no_time_set",
            Conflict::PastDeadline => "joker.past_deadline",
            Conflict::WeeklyLimitReached => "joker.weekly_limit",
            Conflict::JokerNotUsed => "joker.not_used",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_conflict_maps_to_a_catalog_key() {
        let all = [
            Conflict::InvalidTime,
            Conflict::AlreadyReportedToday,
            Conflict::NoWakeupTimeSet,
            Conflict::PastDeadline,
            Conflict::WeeklyLimitReached,
            Conflict::JokerNotUsed,
        ];
        for c in all {
            assert!(c.text_key().contains('.'));
        }
    }
}

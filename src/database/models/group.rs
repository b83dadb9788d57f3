//! Group streak record.

use serde::{Deserialize, Serialize};

/// One group's shared streak. Streak fields mutate only inside the daily
/// aggregation; `best_streak >= current_streak` holds after every cycle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WakeGroup {
    /// Telegram chat ID.
    pub chat_id: i64,
    /// Group title (cached for logs).
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub current_streak: i64,
    #[serde(default)]
    pub best_streak: i64,
}

impl WakeGroup {
    /// Streak values after a fully successful day.
    pub fn advanced(&self) -> (i64, i64) {
        let streak = self.current_streak + 1;
        let best = self.best_streak.max(streak);
        (streak, best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(current_streak: i64, best_streak: i64) -> WakeGroup {
        WakeGroup {
            chat_id: 1,
            title: None,
            current_streak,
            best_streak,
        }
    }

    #[test]
    fn advancing_updates_best_when_passed() {
        assert_eq!(group(4, 4).advanced(), (5, 5));
    }

    #[test]
    fn advancing_keeps_best_when_behind() {
        assert_eq!(group(2, 10).advanced(), (3, 10));
    }
}

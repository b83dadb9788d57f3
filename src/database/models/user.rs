//! Per-member wake-up state.
//!
//! The daily lifecycle: `today_reported`/`joker_used` are set by command
//! handlers during the day and cleared by the aggregator at night;
//! `week_joker_count` is cleared by the week rollover. The guards here are
//! pure so the transition rules are testable without a store; the repository
//! re-states each precondition as an atomic update filter.

use serde::{Deserialize, Serialize};

use crate::clock::DayClock;
use crate::error::Conflict;

/// Good-sleep declarations close at this local hour.
pub const JOKER_CUTOFF_HOUR: u32 = 22;

/// Good-sleep declarations allowed per week window.
pub const WEEKLY_JOKER_LIMIT: i64 = 1;

/// One member's identity and wake-up state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WakeUser {
    /// Telegram user ID.
    pub user_id: u64,
    /// Name shown in replies and broadcasts, refreshed on each interaction.
    pub display_name: String,
    /// Username without @ (lowercase), kept for logs.
    pub username: Option<String>,

    /// Configured wake-up time; both unset means the user is excluded from
    /// aggregation entirely.
    pub wakeup_hour: Option<u8>,
    pub wakeup_minute: Option<u8>,

    /// Unix timestamp of the most recent wake report.
    pub last_report: Option<i64>,
    /// Local calendar-day key of that report, so the already-reported
    /// precondition can live in a store filter.
    pub last_report_day: Option<String>,
    /// Reset nightly by the aggregator.
    #[serde(default)]
    pub today_reported: bool,

    /// Weekly pass for the current cycle; reset nightly by the aggregator.
    #[serde(default)]
    pub joker_used: bool,
    /// Unix timestamp of the most recent good-sleep declaration.
    pub last_joker: Option<i64>,
    /// Declarations used inside the current week window.
    #[serde(default)]
    pub week_joker_count: i64,
    /// Anchor date of the week window (see `DayClock::week_start_key`).
    pub week_start_date: String,

    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl WakeUser {
    pub fn has_wakeup_time(&self) -> bool {
        self.wakeup_hour.is_some() && self.wakeup_minute.is_some()
    }

    /// True when this member counts as a failure for today's aggregation:
    /// no report at all, or the last one was on another calendar day.
    pub fn missed_today(&self, clock: &DayClock, now: i64) -> bool {
        !self.last_report.is_some_and(|ts| clock.same_day(ts, now))
    }

    /// Precondition check for a wake report at `now`.
    pub fn report_conflict(&self, clock: &DayClock, now: i64) -> Option<Conflict> {
        if self.today_reported && self.last_report.is_some_and(|ts| clock.same_day(ts, now)) {
            return Some(Conflict::AlreadyReportedToday);
        }
        if !self.has_wakeup_time() {
            return Some(Conflict::NoWakeupTimeSet);
        }
        None
    }

    /// Precondition check for a good-sleep declaration at the given local hour.
    /// The deadline is checked before the weekly allowance, matching the
    /// order the replies are expected in.
    pub fn declare_conflict(&self, local_hour: u32) -> Option<Conflict> {
        if local_hour >= JOKER_CUTOFF_HOUR {
            return Some(Conflict::PastDeadline);
        }
        if self.week_joker_count >= WEEKLY_JOKER_LIMIT {
            return Some(Conflict::WeeklyLimitReached);
        }
        None
    }

    /// Precondition check for cancelling a good-sleep declaration.
    pub fn cancel_conflict(&self) -> Option<Conflict> {
        if !self.joker_used {
            return Some(Conflict::JokerNotUsed);
        }
        None
    }

    /// Counter value after a cancel, clamped at zero: a week rollover
    /// between declare and cancel zeroes the counter before the decrement.
    /// The store-side pipeline in `UserRepo::try_cancel_joker` computes the
    /// same value atomically.
    pub fn week_count_after_cancel(&self) -> i64 {
        (self.week_joker_count - 1).max(0)
    }

    /// Whether the stored week window is stale relative to the current one.
    pub fn needs_week_rollover(&self, current_week_start: &str) -> bool {
        self.week_start_date != current_week_start
    }
}

/// Validate a declared wake-up time.
pub fn validate_wakeup_time(hour: u32, minute: u32) -> Result<(u8, u8), Conflict> {
    if hour > 23 || minute > 59 {
        return Err(Conflict::InvalidTime);
    }
    Ok((hour as u8, minute as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Tokyo;

    fn clock() -> DayClock {
        DayClock::new(Tokyo)
    }

    fn ts(d: u32, h: u32) -> i64 {
        Tokyo.with_ymd_and_hms(2025, 3, d, h, 0, 0).unwrap().timestamp()
    }

    fn user() -> WakeUser {
        WakeUser {
            user_id: 1,
            display_name: "太郎".into(),
            username: None,
            wakeup_hour: Some(7),
            wakeup_minute: Some(0),
            last_report: None,
            last_report_day: None,
            today_reported: false,
            joker_used: false,
            last_joker: None,
            week_joker_count: 0,
            week_start_date: "2025-03-09".into(),
            updated_at: 0,
        }
    }

    #[test]
    fn wakeup_time_range_validation() {
        for h in 0..=23u32 {
            for m in [0u32, 30, 59] {
                assert!(validate_wakeup_time(h, m).is_ok());
            }
        }
        assert_eq!(validate_wakeup_time(24, 0), Err(Conflict::InvalidTime));
        assert_eq!(validate_wakeup_time(7, 60), Err(Conflict::InvalidTime));
    }

    #[test]
    fn first_report_of_the_day_passes() {
        assert_eq!(user().report_conflict(&clock(), ts(14, 7)), None);
    }

    #[test]
    fn second_report_same_day_conflicts() {
        let mut u = user();
        u.today_reported = true;
        u.last_report = Some(ts(14, 7));
        assert_eq!(
            u.report_conflict(&clock(), ts(14, 9)),
            Some(Conflict::AlreadyReportedToday)
        );
    }

    #[test]
    fn report_allowed_again_after_day_change() {
        let mut u = user();
        u.today_reported = true;
        u.last_report = Some(ts(14, 7));
        assert_eq!(u.report_conflict(&clock(), ts(15, 7)), None);
    }

    #[test]
    fn report_requires_configured_time() {
        let mut u = user();
        u.wakeup_hour = None;
        u.wakeup_minute = None;
        assert_eq!(
            u.report_conflict(&clock(), ts(14, 7)),
            Some(Conflict::NoWakeupTimeSet)
        );
    }

    #[test]
    fn declare_before_cutoff_succeeds_once() {
        let mut u = user();
        assert_eq!(u.declare_conflict(21), None);
        u.week_joker_count = 1;
        assert_eq!(u.declare_conflict(21), Some(Conflict::WeeklyLimitReached));
    }

    #[test]
    fn declare_at_cutoff_hour_is_rejected() {
        assert_eq!(user().declare_conflict(22), Some(Conflict::PastDeadline));
        assert_eq!(user().declare_conflict(23), Some(Conflict::PastDeadline));
    }

    #[test]
    fn cancel_requires_active_declaration() {
        let mut u = user();
        assert_eq!(u.cancel_conflict(), Some(Conflict::JokerNotUsed));
        u.joker_used = true;
        assert_eq!(u.cancel_conflict(), None);
    }

    #[test]
    fn cancel_restores_pre_declare_count() {
        let mut u = user();
        let before = u.week_joker_count;
        u.joker_used = true;
        u.week_joker_count += 1;
        assert_eq!(u.week_count_after_cancel(), before);
    }

    #[test]
    fn cancel_after_rollover_clamps_count_at_zero() {
        let mut u = user();
        u.joker_used = true;
        u.week_joker_count = 0;
        assert_eq!(u.week_count_after_cancel(), 0);
    }

    #[test]
    fn rollover_detection_compares_week_anchor() {
        let u = user();
        assert!(!u.needs_week_rollover("2025-03-09"));
        assert!(u.needs_week_rollover("2025-03-16"));
    }

    #[test]
    fn missed_today_without_report() {
        let mut u = user();
        assert!(u.missed_today(&clock(), ts(14, 12)));
        u.last_report = Some(ts(13, 7));
        assert!(u.missed_today(&clock(), ts(14, 12)));
        u.last_report = Some(ts(14, 7));
        assert!(!u.missed_today(&clock(), ts(14, 12)));
    }
}

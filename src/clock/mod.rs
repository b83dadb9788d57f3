//! Calendar-day and week-boundary computations.
//!
//! Every day/week decision in the bot routes through [`DayClock`] so the
//! boundary policy lives in one place and the timezone is always explicit.
//! Weeks start on Sunday.

use chrono::{DateTime, Datelike, Days, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

/// Wall-clock helper pinned to a single timezone.
#[derive(Debug, Clone, Copy)]
pub struct DayClock {
    tz: Tz,
}

impl DayClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Current unix timestamp in seconds.
    pub fn now(&self) -> i64 {
        Utc::now().timestamp()
    }

    /// Current instant in the configured timezone.
    pub fn now_local(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    /// True iff two instants fall on the same local calendar day.
    pub fn same_day(&self, a: i64, b: i64) -> bool {
        self.local_date(a) == self.local_date(b)
    }

    /// Local calendar-day key, e.g. `2025-03-14`.
    pub fn day_key(&self, ts: i64) -> String {
        self.local_date(ts).format("%Y-%m-%d").to_string()
    }

    /// Day key of the start of the week (Sunday) containing `ts`.
    pub fn week_start_key(&self, ts: i64) -> String {
        let date = self.local_date(ts);
        let back = date.weekday().num_days_from_sunday() as u64;
        let start = date.checked_sub_days(Days::new(back)).unwrap_or(date);
        start.format("%Y-%m-%d").to_string()
    }

    /// Local hour and minute at `ts`.
    pub fn local_clock(&self, ts: i64) -> (u32, u32) {
        let dt = self.to_local(ts);
        (dt.hour(), dt.minute())
    }

    fn local_date(&self, ts: i64) -> NaiveDate {
        self.to_local(ts).date_naive()
    }

    fn to_local(&self, ts: i64) -> DateTime<Tz> {
        DateTime::<Utc>::from_timestamp(ts, 0)
            .unwrap_or(DateTime::UNIX_EPOCH)
            .with_timezone(&self.tz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Tokyo;

    fn clock() -> DayClock {
        DayClock::new(Tokyo)
    }

    fn tokyo_ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
        Tokyo
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .timestamp()
    }

    #[test]
    fn same_day_within_local_day() {
        let a = tokyo_ts(2025, 3, 14, 0, 5);
        let b = tokyo_ts(2025, 3, 14, 23, 55);
        assert!(clock().same_day(a, b));
    }

    #[test]
    fn same_day_false_across_local_midnight() {
        let a = tokyo_ts(2025, 3, 14, 23, 59);
        let b = tokyo_ts(2025, 3, 15, 0, 1);
        assert!(!clock().same_day(a, b));
    }

    #[test]
    fn day_boundary_uses_local_not_utc() {
        // 2025-03-14 07:00 JST is still 2025-03-13 in UTC.
        let ts = tokyo_ts(2025, 3, 14, 7, 0);
        assert_eq!(clock().day_key(ts), "2025-03-14");
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2025-03-14 is a Friday; that week's Sunday is 2025-03-09.
        let friday = tokyo_ts(2025, 3, 14, 12, 0);
        assert_eq!(clock().week_start_key(friday), "2025-03-09");

        // Sunday anchors itself.
        let sunday = tokyo_ts(2025, 3, 9, 6, 0);
        assert_eq!(clock().week_start_key(sunday), "2025-03-09");

        // Saturday still belongs to the previous Sunday.
        let saturday = tokyo_ts(2025, 3, 15, 23, 0);
        assert_eq!(clock().week_start_key(saturday), "2025-03-09");
    }

    #[test]
    fn week_key_changes_exactly_at_sunday() {
        let saturday = tokyo_ts(2025, 3, 15, 23, 59);
        let next_sunday = tokyo_ts(2025, 3, 16, 0, 0);
        assert_ne!(
            clock().week_start_key(saturday),
            clock().week_start_key(next_sunday)
        );
        assert_eq!(clock().week_start_key(next_sunday), "2025-03-16");
    }

    #[test]
    fn local_clock_reports_local_time() {
        let ts = tokyo_ts(2025, 3, 14, 21, 30);
        assert_eq!(clock().local_clock(ts), (21, 30));
    }
}

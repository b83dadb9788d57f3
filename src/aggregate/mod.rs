//! Daily group aggregation.
//!
//! Once per cycle every group is scanned independently: members with a
//! configured wake-up time either reported today, hold a good-sleep pass, or
//! failed. A clean day advances the shared streak; any failure resets it.
//! One group's trouble never stops the rest of the run.

pub mod scheduler;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{info, warn};

use crate::bot::dispatcher::{AppState, WakeBot};
use crate::clock::DayClock;
use crate::database::{WakeGroup, WakeUser};
use crate::i18n;

/// What a single group's cycle produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No member has a wake-up time configured; nothing mutated, nothing sent.
    Skipped,
    /// Everyone passed; carries the advanced streak values.
    Success { streak: i64, best: i64 },
    /// Somebody overslept; carries their names and the pre-reset streak.
    Failure { failed: Vec<String>, lost_streak: i64 },
}

/// Evaluate one group for today. Pure; persistence happens in the runner.
///
/// Members without a configured wake-up time are invisible to the
/// accounting: they neither pass nor fail. Pass holders are exempt, not
/// failures.
pub fn evaluate(
    group: &WakeGroup,
    members: &[WakeUser],
    now: i64,
    clock: &DayClock,
) -> CycleOutcome {
    let configured: Vec<&WakeUser> = members.iter().filter(|u| u.has_wakeup_time()).collect();
    if configured.is_empty() {
        return CycleOutcome::Skipped;
    }

    let failed: Vec<String> = configured
        .iter()
        .filter(|u| !u.joker_used && u.missed_today(clock, now))
        .map(|u| u.display_name.clone())
        .collect();

    if failed.is_empty() {
        let (streak, best) = group.advanced();
        CycleOutcome::Success { streak, best }
    } else {
        CycleOutcome::Failure {
            failed,
            lost_streak: group.current_streak,
        }
    }
}

/// Run one full aggregation cycle over all known groups.
///
/// Per-group failures are logged and skipped; only failing to list the
/// groups at all aborts the cycle.
pub async fn run_cycle(bot: &WakeBot, state: &AppState) -> Result<()> {
    let now = state.clock.now();
    info!("Running daily aggregation for {}", state.clock.day_key(now));

    let groups = state.groups.list_all().await?;
    for group in groups {
        if let Err(e) = run_group(bot, state, &group, now).await {
            warn!("Aggregation failed for group {}: {:#}", group.chat_id, e);
        }
    }
    Ok(())
}

async fn run_group(bot: &WakeBot, state: &AppState, group: &WakeGroup, now: i64) -> Result<()> {
    let member_ids = state.members.member_ids(group.chat_id).await?;
    if member_ids.is_empty() {
        return Ok(());
    }

    let members = state.users.get_many(&member_ids).await?;

    let text = match evaluate(group, &members, now, &state.clock) {
        CycleOutcome::Skipped => return Ok(()),
        CycleOutcome::Success { streak, best } => {
            reset_participants(state, &members).await?;
            state
                .groups
                .record_success(group.chat_id, streak, best)
                .await?;
            info!("Group {}: all members passed, streak {}", group.chat_id, streak);
            i18n::render("daily.all_success", &[("streak", &streak.to_string())])
        }
        CycleOutcome::Failure { failed, lost_streak } => {
            reset_participants(state, &members).await?;
            state.groups.reset_streak(group.chat_id).await?;
            info!(
                "Group {}: {} member(s) failed, streak of {} lost",
                group.chat_id,
                failed.len(),
                lost_streak
            );
            i18n::render(
                "daily.someone_failed",
                &[
                    ("failedUsers", &failed.join("、")),
                    ("oldStreak", &lost_streak.to_string()),
                ],
            )
        }
    };

    bot.send_message(ChatId(group.chat_id), text).await?;
    Ok(())
}

/// Nightly reset for every member that took part in this cycle, regardless
/// of their individual outcome.
async fn reset_participants(state: &AppState, members: &[WakeUser]) -> Result<()> {
    let configured_ids: Vec<u64> = members
        .iter()
        .filter(|u| u.has_wakeup_time())
        .map(|u| u.user_id)
        .collect();
    state.users.reset_daily_flags(&configured_ids).await
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

    fn member(name: &str, id: u64) -> WakeUser {
        WakeUser {
            user_id: id,
            display_name: name.into(),
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

    fn group(streak: i64, best: i64) -> WakeGroup {
        WakeGroup {
            chat_id: 100,
            title: None,
            current_streak: streak,
            best_streak: best,
        }
    }

    #[test]
    fn all_reported_advances_streak_and_best() {
        let now = ts(14, 12);
        let mut a = member("A", 1);
        a.last_report = Some(ts(14, 7));
        a.today_reported = true;
        let mut b = member("B", 2);
        b.last_report = Some(ts(14, 6));
        b.today_reported = true;

        let outcome = evaluate(&group(4, 4), &[a, b], now, &clock());
        assert_eq!(outcome, CycleOutcome::Success { streak: 5, best: 5 });
    }

    #[test]
    fn best_streak_is_not_lowered() {
        let now = ts(14, 12);
        let mut a = member("A", 1);
        a.last_report = Some(ts(14, 7));

        let outcome = evaluate(&group(1, 9), &[a], now, &clock());
        assert_eq!(outcome, CycleOutcome::Success { streak: 2, best: 9 });
    }

    #[test]
    fn pass_holder_is_exempt_and_non_reporter_fails() {
        let now = ts(14, 12);
        let mut a = member("A", 1);
        a.last_report = Some(ts(14, 7));
        let mut b = member("B", 2);
        b.joker_used = true;
        let c = member("C", 3); // configured, no report

        let outcome = evaluate(&group(6, 6), &[a, b, c], now, &clock());
        assert_eq!(
            outcome,
            CycleOutcome::Failure {
                failed: vec!["C".into()],
                lost_streak: 6,
            }
        );
    }

    #[test]
    fn yesterdays_report_does_not_count() {
        let now = ts(14, 12);
        let mut a = member("A", 1);
        a.last_report = Some(ts(13, 7));

        let outcome = evaluate(&group(2, 5), &[a], now, &clock());
        assert_eq!(
            outcome,
            CycleOutcome::Failure {
                failed: vec!["A".into()],
                lost_streak: 2,
            }
        );
    }

    #[test]
    fn unconfigured_member_is_invisible_to_accounting() {
        let now = ts(14, 12);
        let mut a = member("A", 1);
        a.last_report = Some(ts(14, 7));
        let mut idle = member("B", 2);
        idle.wakeup_hour = None;
        idle.wakeup_minute = None; // would fail if counted

        let outcome = evaluate(&group(0, 0), &[a, idle], now, &clock());
        assert_eq!(outcome, CycleOutcome::Success { streak: 1, best: 1 });
    }

    #[test]
    fn group_with_no_configured_members_is_skipped() {
        let now = ts(14, 12);
        let mut idle = member("A", 1);
        idle.wakeup_hour = None;
        idle.wakeup_minute = None;

        assert_eq!(
            evaluate(&group(3, 3), &[idle], now, &clock()),
            CycleOutcome::Skipped
        );
        assert_eq!(evaluate(&group(3, 3), &[], now, &clock()), CycleOutcome::Skipped);
    }

    #[test]
    fn everyone_on_pass_still_counts_as_success() {
        let now = ts(14, 12);
        let mut a = member("A", 1);
        a.joker_used = true;

        let outcome = evaluate(&group(7, 7), &[a], now, &clock());
        assert_eq!(outcome, CycleOutcome::Success { streak: 8, best: 8 });
    }
}

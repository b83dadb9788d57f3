//! Command classification.
//!
//! Inbound text is mapped onto a closed intent set so downstream handling is
//! an exhaustive `match`. Classification is pure; the keyword tables are an
//! immutable value built once at startup.

/// Typed intent of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// "7時に起きる" / "6:30に起きる" - declare a wake-up time.
    /// Range validation happens in the handler, not here.
    SetWakeupTime { hour: u32, minute: u32 },
    /// "起きた", "おはよう", ... - report waking up.
    WakeupReport,
    /// "ぐっすり" - use the weekly good-sleep pass for tomorrow.
    GoodSleepDeclare,
    /// "ぐっすり取消" - take the declaration back.
    GoodSleepCancel,
    /// "記録確認" - show the group streak.
    RecordCheck,
    /// "設定確認" - show the user's configured wake-up time.
    SettingsCheck,
    /// "使い方" / "help".
    Help,
    Unknown,
}

/// Fixed command keyword tables.
///
/// Wake-report keywords match as substrings; everything else matches the
/// whole (trimmed) message exactly.
#[derive(Debug, Clone)]
pub struct Keywords {
    pub wake_report: Vec<&'static str>,
    pub good_sleep: Vec<&'static str>,
    pub good_sleep_cancel: Vec<&'static str>,
    pub record_check: Vec<&'static str>,
    pub settings_check: Vec<&'static str>,
    pub help: Vec<&'static str>,
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            wake_report: vec!["起きた", "起床", "おはよう", "朝"],
            good_sleep: vec!["ぐっすり", "明日パス", "明日休み"],
            good_sleep_cancel: vec!["ぐっすり取消", "ぐっすり取り消し", "ぐっすりキャンセル"],
            record_check: vec!["記録確認", "記録"],
            settings_check: vec!["設定確認", "設定"],
            help: vec!["使い方", "ヘルプ", "help"],
        }
    }
}

/// Classify message text into an [`Intent`].
///
/// The time-setting pattern is checked before the wake keywords so that
/// "朝7時に起きる" configures a time instead of counting as a report.
pub fn classify(text: &str, keywords: &Keywords) -> Intent {
    if let Some((hour, minute)) = extract_wakeup_time(text) {
        return Intent::SetWakeupTime { hour, minute };
    }

    if keywords.wake_report.iter().any(|k| text.contains(k)) {
        return Intent::WakeupReport;
    }

    let trimmed = text.trim();
    if keywords.good_sleep_cancel.iter().any(|k| trimmed == *k) {
        return Intent::GoodSleepCancel;
    }
    if keywords.good_sleep.iter().any(|k| trimmed == *k) {
        return Intent::GoodSleepDeclare;
    }
    if keywords.record_check.iter().any(|k| trimmed == *k) {
        return Intent::RecordCheck;
    }
    if keywords.settings_check.iter().any(|k| trimmed == *k) {
        return Intent::SettingsCheck;
    }
    if keywords.help.iter().any(|k| trimmed == *k) {
        return Intent::Help;
    }

    Intent::Unknown
}

/// Extract a wake-up time declaration anywhere in the text.
///
/// Accepted forms: `H時に起きる`, `H時M分に起きる`, `H:Mに起きる`.
/// The minute defaults to 0 when omitted. Out-of-range values are extracted
/// as-is so the handler can answer with the format error.
pub fn extract_wakeup_time(text: &str) -> Option<(u32, u32)> {
    let chars: Vec<char> = text.chars().collect();
    for start in 0..chars.len() {
        if let Some(hm) = try_parse_time(&chars, start) {
            return Some(hm);
        }
    }
    None
}

fn try_parse_time(chars: &[char], start: usize) -> Option<(u32, u32)> {
    let mut i = start;
    let (hour, next) = take_digits(chars, i)?;
    i = next;

    let mut minute = 0;
    match chars.get(i)? {
        ':' | '：' => {
            i += 1;
            if let Some((m, next)) = take_digits(chars, i) {
                minute = m;
                i = next;
            }
        }
        '時' => {
            i += 1;
            if let Some((m, next)) = take_digits(chars, i) {
                minute = m;
                i = next;
                if chars.get(i) == Some(&'分') {
                    i += 1;
                }
            }
        }
        _ => return None,
    }

    for expected in ['に', '起', 'き', 'る'] {
        if chars.get(i) != Some(&expected) {
            return None;
        }
        i += 1;
    }

    Some((hour, minute))
}

/// Consume one or two ASCII digits at `start`.
fn take_digits(chars: &[char], start: usize) -> Option<(u32, usize)> {
    let mut value = 0u32;
    let mut i = start;
    while i < chars.len() && i - start < 2 {
        match chars[i].to_digit(10) {
            Some(d) => value = value * 10 + d,
            None => break,
        }
        i += 1;
    }
    if i == start { None } else { Some((value, i)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw() -> Keywords {
        Keywords::default()
    }

    #[test]
    fn parses_hour_only_form() {
        assert_eq!(extract_wakeup_time("7時に起きる"), Some((7, 0)));
    }

    #[test]
    fn parses_hour_minute_form() {
        assert_eq!(extract_wakeup_time("7時30分に起きる"), Some((7, 30)));
        assert_eq!(extract_wakeup_time("7時30に起きる"), Some((7, 30)));
    }

    #[test]
    fn parses_colon_form() {
        assert_eq!(extract_wakeup_time("6:30に起きる"), Some((6, 30)));
        assert_eq!(extract_wakeup_time("6：30に起きる"), Some((6, 30)));
    }

    #[test]
    fn parses_time_embedded_in_sentence() {
        assert_eq!(extract_wakeup_time("明日から朝7時に起きる！"), Some((7, 0)));
    }

    #[test]
    fn extracts_out_of_range_values_for_later_validation() {
        assert_eq!(extract_wakeup_time("24時に起きる"), Some((24, 0)));
        assert_eq!(extract_wakeup_time("7:60に起きる"), Some((7, 60)));
    }

    #[test]
    fn rejects_text_without_the_pattern() {
        assert_eq!(extract_wakeup_time("起きる"), None);
        assert_eq!(extract_wakeup_time("7時に寝る"), None);
    }

    #[test]
    fn time_setting_wins_over_wake_keywords() {
        // Contains the wake keyword 朝 but is a time declaration.
        assert_eq!(
            classify("朝7時に起きる", &kw()),
            Intent::SetWakeupTime { hour: 7, minute: 0 }
        );
    }

    #[test]
    fn wake_report_matches_as_substring() {
        assert_eq!(classify("おはようございます！", &kw()), Intent::WakeupReport);
        assert_eq!(classify("今起きた", &kw()), Intent::WakeupReport);
    }

    #[test]
    fn good_sleep_requires_exact_match() {
        assert_eq!(classify("ぐっすり", &kw()), Intent::GoodSleepDeclare);
        assert_eq!(classify("明日パス", &kw()), Intent::GoodSleepDeclare);
        assert_eq!(classify("今日はぐっすり寝たい", &kw()), Intent::Unknown);
    }

    #[test]
    fn cancel_is_checked_before_declare() {
        // "ぐっすり取消" contains "ぐっすり" as a prefix; exact matching plus
        // cancel-first ordering keeps it a cancel.
        assert_eq!(classify("ぐっすり取消", &kw()), Intent::GoodSleepCancel);
        assert_eq!(classify("ぐっすりキャンセル", &kw()), Intent::GoodSleepCancel);
    }

    #[test]
    fn status_commands_match_exactly() {
        assert_eq!(classify("記録確認", &kw()), Intent::RecordCheck);
        assert_eq!(classify("記録", &kw()), Intent::RecordCheck);
        assert_eq!(classify("設定", &kw()), Intent::SettingsCheck);
        assert_eq!(classify(" 使い方 ", &kw()), Intent::Help);
        assert_eq!(classify("help", &kw()), Intent::Help);
    }

    #[test]
    fn everything_else_is_unknown() {
        assert_eq!(classify("こんばんは", &kw()), Intent::Unknown);
        assert_eq!(classify("", &kw()), Intent::Unknown);
    }
}

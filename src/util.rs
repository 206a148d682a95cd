use std::borrow::Cow;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, Utc};

static EMOJI_REPLACER: LazyLock<gh_emoji::Replacer> = LazyLock::new(gh_emoji::Replacer::new);

/// Expand GitHub emoji shortcodes (e.g. `:tada:` → 🎉) in the given text.
///
/// Returns `Cow::Borrowed` when no shortcodes are found, avoiding allocation.
pub(crate) fn expand_emoji(text: &str) -> Cow<'_, str> {
    EMOJI_REPLACER.replace_all(text)
}

/// `"1 minute"`, `"3 minutes"`.
pub(crate) fn pluralize(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Format `dt` relative to `now`, e.g. `"just now"`, `"5 minutes ago"`,
/// `"1 hour ago"`, `"10 days ago"`.
///
/// Months are 30 days and years 365 days.
pub fn format_relative_time(dt: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(dt);

    if elapsed.num_seconds() < 60 {
        return "just now".to_owned();
    }
    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return format!("{} ago", pluralize(minutes, "minute"));
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{} ago", pluralize(hours, "hour"));
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{} ago", pluralize(days, "day"));
    }
    if days < 365 {
        return format!("{} ago", pluralize(days / 30, "month"));
    }
    format!("{} ago", pluralize(days / 365, "year"))
}

/// Compact interval text: `"90s"` → `"1m30s"`, `"1h30m"`, `"5m"`.
pub fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);
    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if seconds > 0 || out.is_empty() {
        out.push_str(&format!("{seconds}s"));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn ago(d: TimeDelta) -> String {
        format_relative_time(&(now() - d), &now())
    }

    #[test]
    fn relative_time_thresholds() {
        assert_eq!(ago(TimeDelta::seconds(45)), "just now");
        assert_eq!(ago(TimeDelta::seconds(60)), "1 minute ago");
        assert_eq!(ago(TimeDelta::minutes(59)), "59 minutes ago");
        assert_eq!(ago(TimeDelta::minutes(90)), "1 hour ago");
        assert_eq!(ago(TimeDelta::hours(23)), "23 hours ago");
        assert_eq!(ago(TimeDelta::hours(24)), "1 day ago");
        assert_eq!(ago(TimeDelta::days(10)), "10 days ago");
        assert_eq!(ago(TimeDelta::days(29)), "29 days ago");
        assert_eq!(ago(TimeDelta::days(30)), "1 month ago");
        assert_eq!(ago(TimeDelta::days(364)), "12 months ago");
        assert_eq!(ago(TimeDelta::days(365)), "1 year ago");
        assert_eq!(ago(TimeDelta::days(800)), "2 years ago");
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        assert_eq!(ago(TimeDelta::minutes(-5)), "just now");
    }

    #[test]
    fn pluralize_counts() {
        assert_eq!(pluralize(1, "hour"), "1 hour");
        assert_eq!(pluralize(0, "hour"), "0 hours");
        assert_eq!(pluralize(2, "day"), "2 days");
    }

    #[test]
    fn interval_text() {
        assert_eq!(format_interval(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_interval(Duration::from_secs(300)), "5m");
        assert_eq!(format_interval(Duration::from_secs(5400)), "1h30m");
        assert_eq!(format_interval(Duration::from_secs(3601)), "1h1s");
        assert_eq!(format_interval(Duration::ZERO), "0s");
    }

    #[test]
    fn known_shortcode_is_expanded() {
        assert_eq!(expand_emoji(":tada:").as_ref(), "🎉");
    }

    #[test]
    fn text_without_shortcodes_is_unchanged() {
        let result = expand_emoji("Fix the build");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result.as_ref(), "Fix the build");
    }
}

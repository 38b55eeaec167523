//! Trailing-window date arithmetic.

use chrono::{DateTime, Days, Utc};

/// Start of a trailing window of `days` calendar days ending at `now`.
///
/// Calendar subtraction, not a fixed seconds offset: stepping back 30 days
/// from March 31 lands on March 1, and day boundaries follow the calendar
/// rather than a 2,592,000-second delta.
#[must_use]
pub fn trailing_window_start(now: DateTime<Utc>, days: u64) -> DateTime<Utc> {
    now.checked_sub_days(Days::new(days))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_thirty_days_back() {
        let now = utc("2026-08-29T12:30:00Z");
        assert_eq!(trailing_window_start(now, 30), utc("2026-07-30T12:30:00Z"));
    }

    #[test]
    fn test_month_boundary() {
        let now = utc("2026-03-31T00:00:00Z");
        assert_eq!(trailing_window_start(now, 30), utc("2026-03-01T00:00:00Z"));
    }

    #[test]
    fn test_leap_day() {
        let now = utc("2024-03-30T08:00:00Z");
        assert_eq!(trailing_window_start(now, 30), utc("2024-02-29T08:00:00Z"));
    }

    #[test]
    fn test_time_of_day_preserved() {
        let now = utc("2026-08-29T23:59:59Z");
        assert_eq!(trailing_window_start(now, 1), utc("2026-08-28T23:59:59Z"));
    }
}

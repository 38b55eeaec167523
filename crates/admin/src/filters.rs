//! Custom Askama template filters and shared display formatting.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Format a price for display, e.g. `£799.95`.
#[must_use]
pub fn money(amount: Decimal) -> String {
    format!("£{amount:.2}")
}

/// Format a timestamp for display, e.g. `2026-08-29 12:30:00`.
#[must_use]
pub fn datetime(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_money_pads_to_two_decimals() {
        assert_eq!(money("799.9".parse().unwrap()), "£799.90");
        assert_eq!(money("8".parse().unwrap()), "£8.00");
    }

    #[test]
    fn test_money_rounds_extra_precision() {
        assert_eq!(money("12.346".parse().unwrap()), "£12.35");
    }

    #[test]
    fn test_datetime_format() {
        let ts: DateTime<Utc> = "2026-08-29T12:30:05Z".parse().unwrap();
        assert_eq!(datetime(&ts), "2026-08-29 12:30:05");
    }
}

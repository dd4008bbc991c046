use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

fn epoch() -> NaiveDate {
    NaiveDate::default()
}

/// Parse `"YYYY-MM-DD"` into a calendar date.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date literal {:?}", s))
}

/// Days since 1970-01-01, the Arrow `Date32` encoding.
pub fn date_to_days(date: NaiveDate) -> i32 {
    (date - epoch()).num_days() as i32
}

/// Inverse of [`date_to_days`].
pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    epoch().checked_add_signed(Duration::days(i64::from(days)))
}

/// Truncate a date to its `"YYYY-MM"` month key.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

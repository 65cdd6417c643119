//! Calendar and date utilities
//!
//! Pure functions over calendar dates. Anything that takes a string refuses
//! malformed input with [`DomainError::InvalidDate`] instead of clamping it.

use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, Utc};

use crate::domain::DomainError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    let trimmed = s.trim();
    // chrono accepts single-digit months and days; the stored keys never have them
    if trimmed.len() != 10 {
        return Err(DomainError::InvalidDate(format!(
            "'{}' is not a YYYY-MM-DD date",
            s
        )));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|e| DomainError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Parse an optional date, falling back to a default when absent
pub fn parse_date_or(s: Option<&str>, default: NaiveDate) -> Result<NaiveDate, DomainError> {
    match s {
        Some(value) if !value.trim().is_empty() => parse_date(value),
        _ => Ok(default),
    }
}

/// Document key for a date, `YYYY-MM-DD`
pub fn iso_date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Signed whole days from `a` to `b` (positive when `b` is later)
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// `count` consecutive dates ending at `end` inclusive, oldest first
///
/// A count of zero yields an empty range.
pub fn date_range(end: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count as usize);
    let mut cursor = Some(end);
    while dates.len() < count as usize {
        let Some(day) = cursor else { break };
        dates.push(day);
        cursor = day.pred_opt();
    }
    dates.reverse();
    dates
}

/// ISO-8601 week key, e.g. `2026-W06`
///
/// Uses the ISO week-numbering year, so 2024-12-30 belongs to `2025-W01`.
pub fn iso_week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// Add whole calendar months, clamping to the last day of a shorter month
pub fn add_months_clamped(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Time left until a fixed end instant; zero once it has passed
pub fn time_remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let remaining = end - now;
    if remaining < Duration::zero() {
        Duration::zero()
    } else {
        remaining
    }
}

/// `MM:SS` rendering of a countdown, hours folded into minutes
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    format!("{:02}:{:02}", total / 60, total % 60)
}

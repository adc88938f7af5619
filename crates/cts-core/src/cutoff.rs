//! Parsing of the report's cutoff argument.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use regex::Regex;
use thiserror::Error;

/// Pre-compiled regex for `YYYYMMDD` dates.
static DATE_ARG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").unwrap());

/// Lookback used when no cutoff is given.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// A cutoff argument that is neither a day count nor a `YYYYMMDD` date.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "Invalid argument '{value}'. Use a number of days (e.g., 7) or date in YYYYMMDD format (e.g., 20250101)"
)]
pub struct CutoffError {
    pub value: String,
}

/// Parses a cutoff argument relative to `now`.
///
/// Supports:
/// - `YYYYMMDD`: midnight at the start of that date
/// - an integer `N`: `now` minus `N` days
pub fn parse_cutoff(arg: &str, now: NaiveDateTime) -> Result<NaiveDateTime, CutoffError> {
    let arg = arg.trim();

    if let Some(date) = DATE_ARG_RE.captures(arg).and_then(|caps| {
        NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )
    }) {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    arg.parse::<i64>()
        .ok()
        .and_then(TimeDelta::try_days)
        .and_then(|lookback| now.checked_sub_signed(lookback))
        .filter(|cutoff| cutoff.year() >= 1)
        .ok_or_else(|| CutoffError {
            value: arg.to_string(),
        })
}

/// Parses `arg` if given, otherwise returns the default lookback from `now`.
pub fn resolve_cutoff(arg: Option<&str>, now: NaiveDateTime) -> Result<NaiveDateTime, CutoffError> {
    match arg {
        Some(arg) => parse_cutoff(arg, now),
        None => Ok(now - TimeDelta::days(DEFAULT_LOOKBACK_DAYS)),
    }
}

/// Formats a cutoff for comparison against stored timestamps.
///
/// Sub-microsecond precision is dropped; the fraction is only written when the
/// remaining microseconds are non-zero.
pub fn format_cutoff(cutoff: NaiveDateTime) -> String {
    if cutoff.nanosecond() / 1_000 == 0 {
        cutoff.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        cutoff.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

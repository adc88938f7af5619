//! Fifteen-minute time buckets, the unit of attributed activity.
//!
//! Timestamps are treated as naive wall-clock times: any UTC offset in the
//! source is discarded rather than converted. Reports built from the same data
//! therefore stay stable regardless of the machine's time zone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use thiserror::Error;

/// Width of a bucket in minutes.
pub const BUCKET_MINUTES: u32 = 15;

/// Hours attributed to a single bucket.
pub const HOURS_PER_BUCKET: f64 = 0.25;

/// Naive formats accepted after RFC 3339 fails.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A timestamp that could not be interpreted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid timestamp: {value}")]
pub struct TimestampError {
    pub value: String,
}

/// The start of a 15-minute window (minute in {0, 15, 30, 45}, no seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeBucket(NaiveDateTime);

impl TimeBucket {
    /// Returns the bucket containing `dt`.
    pub fn containing(dt: NaiveDateTime) -> Self {
        let into_bucket = TimeDelta::minutes(i64::from(dt.minute() % BUCKET_MINUTES))
            + TimeDelta::seconds(i64::from(dt.second()))
            + TimeDelta::nanoseconds(i64::from(dt.nanosecond()));
        Self(dt - into_bucket)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.0
    }

    /// Calendar day the bucket falls on.
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }
}

/// Hours represented by `buckets` buckets.
#[allow(clippy::cast_precision_loss)]
pub fn hours(buckets: usize) -> f64 {
    buckets as f64 * HOURS_PER_BUCKET
}

/// Parses an ISO 8601 timestamp into a naive wall-clock time.
///
/// A trailing `Z` or numeric offset is accepted and dropped; the clock reading
/// is kept as written. Date-only values resolve to midnight.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TimestampError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| TimestampError {
            value: value.to_string(),
        })
}

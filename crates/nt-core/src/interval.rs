//! Closed time intervals over epoch milliseconds.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A range of time `[start, end]` in milliseconds since the Unix epoch.
///
/// The bounds are validated on construction so that `start <= end` always
/// holds. Intervals order by start time and then by duration, which is the
/// key used to sort the occurrences inside an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "IntervalBounds")]
pub struct Interval {
    start: i64,
    end: i64,
}

/// Unvalidated wire form of an [`Interval`].
#[derive(Deserialize)]
struct IntervalBounds {
    start: i64,
    end: i64,
}

impl TryFrom<IntervalBounds> for Interval {
    type Error = ValidationError;

    fn try_from(bounds: IntervalBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.start, bounds.end)
    }
}

impl Interval {
    /// Interval matching any stored timestamp.
    ///
    /// Range queries treat the end bound as exclusive, so `i64::MAX` itself is
    /// never matched. Keep it that way: clipping at infinity depends on it.
    pub const FOREVER: Self = Self {
        start: i64::MIN,
        end: i64::MAX,
    };

    /// Creates a new interval after validation.
    pub const fn new(start: i64, end: i64) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates an interval from two UTC timestamps.
    pub fn from_datetimes(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        Self::new(start.timestamp_millis(), end.timestamp_millis())
    }

    /// Returns the interval covering a whole calendar day in `tz`.
    ///
    /// The interval runs from local midnight to one millisecond before the
    /// next local midnight. Ambiguous midnights (DST fall-back) resolve to the
    /// earlier instant; a midnight that does not exist resolves to 01:00.
    pub fn for_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Self {
        let start = local_midnight_millis(day, tz);
        let end = day
            .succ_opt()
            .map_or(i64::MAX, |next| local_midnight_millis(next, tz).saturating_sub(1));
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Start of the interval, in epoch milliseconds.
    pub const fn start(&self) -> i64 {
        self.start
    }

    /// End of the interval, in epoch milliseconds.
    pub const fn end(&self) -> i64 {
        self.end
    }

    /// Length of the interval in milliseconds.
    pub const fn duration_ms(&self) -> u64 {
        self.end.abs_diff(self.start)
    }

    /// Returns the portion of `self` that also lies within `other`.
    ///
    /// Returns `None` when the two intervals share no instant.
    pub fn overlap(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(Self { start, end })
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            format_timestamp(self.start),
            format_timestamp(self.end)
        )
    }
}

/// Formats epoch milliseconds as RFC 3339 UTC.
///
/// Falls back to the raw number for values chrono cannot represent, such as
/// the bounds of [`Interval::FOREVER`].
pub fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis).map_or_else(
        || millis.to_string(),
        |dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

fn local_midnight_millis<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> i64 {
    let midnight = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            day.and_hms_opt(1, 0, 0)
                .and_then(|one_am| tz.from_local_datetime(&one_am).earliest())
        })
        .map_or_else(
            || midnight.and_utc().timestamp_millis(),
            |dt| dt.timestamp_millis(),
        )
}

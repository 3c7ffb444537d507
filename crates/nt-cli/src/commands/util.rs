//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Local, TimeDelta, Utc};
use nt_core::Interval;
use regex::Regex;

use crate::cli::WindowArgs;

/// "<n> <unit>[s] ago".
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());

/// Parses a point in time given on the command line.
///
/// Accepts RFC 3339 ("2026-01-15T10:30:00Z"), "now", or a relative offset
/// such as "30 minutes ago" or "2 weeks ago".
pub fn parse_datetime(s: &str) -> anyhow::Result<DateTime<Utc>> {
    parse_datetime_at(s, Utc::now())
}

fn parse_datetime_at(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if s == "now" {
        return Ok(now);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let caps = RELATIVE_TIME_RE.captures(s).with_context(|| {
        format!("invalid time {s:?}: use RFC 3339 (2026-01-15T10:30:00Z), \"now\" or \"N hours ago\"")
    })?;
    let amount: i64 = caps[1]
        .parse()
        .with_context(|| format!("amount out of range in {s:?}"))?;
    let offset = match &caps[2] {
        "minute" => TimeDelta::try_minutes(amount),
        "hour" => TimeDelta::try_hours(amount),
        "day" => TimeDelta::try_days(amount),
        "week" => TimeDelta::try_weeks(amount),
        unit => anyhow::bail!("unknown time unit {unit:?}"),
    };
    offset
        .and_then(|offset| now.checked_sub_signed(offset))
        .with_context(|| format!("{s:?} is too far in the past"))
}

/// Resolves the query window selected on the command line.
///
/// Missing bounds fall back to the matching bound of [`Interval::FOREVER`].
pub fn resolve_window(window: &WindowArgs) -> anyhow::Result<Interval> {
    if window.day {
        return Ok(Interval::for_day(Local::now().date_naive(), &Local));
    }

    let start = match window.start.as_deref() {
        Some(s) => parse_datetime(s)?.timestamp_millis(),
        None => Interval::FOREVER.start(),
    };
    let end = match window.end.as_deref() {
        Some(s) => parse_datetime(s)?.timestamp_millis(),
        None => Interval::FOREVER.end(),
    };
    Interval::new(start, end).context("invalid time window")
}

/// Describes a query window for report headers.
pub fn describe_window(window: &Interval) -> String {
    if *window == Interval::FOREVER {
        "all time".to_string()
    } else {
        window.to_string()
    }
}

/// Formats milliseconds as a short duration.
///
/// Returns "Xh Ym" if >= 1 hour, "Xm" if >= 1 minute, "Xs" otherwise.
pub fn format_duration(ms: u64) -> String {
    let total_seconds = ms / 1000;
    if total_seconds < 60 {
        return format!("{total_seconds}s");
    }

    let total_minutes = total_seconds / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

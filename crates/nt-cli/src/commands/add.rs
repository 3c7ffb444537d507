//! Add command for recording a new event.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use nt_core::{EventStore, Tracker, format_timestamp};

use super::util::format_duration;

/// Records an event from `start` to `end`.
///
/// Without a description, the description of the most recent event is reused.
pub fn run<W: Write, S: EventStore>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    description: Option<&str>,
) -> Result<()> {
    let description = match description {
        Some(description) => description.to_string(),
        None => tracker
            .most_recent_event()?
            .map(|event| event.description().to_string())
            .context("no description given and no previous event to take it from")?,
    };

    let (start, end) = (start.timestamp_millis(), end.timestamp_millis());
    tracker
        .add_event(start, end, description.as_str())
        .context("failed to record event")?;

    writeln!(
        writer,
        "Recorded {description} from {} to {} ({})",
        format_timestamp(start),
        format_timestamp(end),
        format_duration(end.abs_diff(start)),
    )?;
    Ok(())
}

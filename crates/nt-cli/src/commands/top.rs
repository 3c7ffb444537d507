//! Top command for showing the longest activity in a window.

use std::io::Write;

use anyhow::Result;
use nt_core::{EventStore, Interval, Tracker, format_timestamp};

use super::summary::AggregateJson;
use super::util::{describe_window, format_duration};

/// Runs the top command.
pub fn run<W: Write, S: EventStore>(
    writer: &mut W,
    tracker: &Tracker<S>,
    window: &Interval,
    json: bool,
) -> Result<()> {
    let top = tracker.top_event_in_interval(window)?;

    if json {
        let entry = top.as_ref().map(AggregateJson::from);
        writeln!(writer, "{}", serde_json::to_string_pretty(&entry)?)?;
        return Ok(());
    }

    let Some(top) = top else {
        writeln!(writer, "No events recorded.")?;
        return Ok(());
    };
    writeln!(
        writer,
        "Top activity for {}: {} ({}, last started {})",
        describe_window(window),
        top.description(),
        format_duration(top.total_duration_ms()),
        format_timestamp(top.latest_start()),
    )?;
    Ok(())
}

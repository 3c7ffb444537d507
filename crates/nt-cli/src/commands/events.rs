//! Events command for listing recorded events in a window.

use std::io::Write;

use anyhow::Result;
use nt_core::{Event, EventStore, Interval, Tracker, format_timestamp};

use super::util::format_duration;

/// Runs the events command.
///
/// Events cut by the window are shown clipped. With `json`, each event is
/// written as one JSON object per line.
pub fn run<W: Write, S: EventStore>(
    writer: &mut W,
    tracker: &Tracker<S>,
    window: &Interval,
    json: bool,
) -> Result<()> {
    let mut events: Vec<Event> = tracker.events_in_interval(window)?.into_iter().collect();
    events.sort_by_key(Event::start);

    if json {
        for event in &events {
            writeln!(writer, "{}", serde_json::to_string(event)?)?;
        }
        return Ok(());
    }

    if events.is_empty() {
        writeln!(writer, "No events recorded.")?;
        return Ok(());
    }

    for event in &events {
        writeln!(
            writer,
            "{}  {}  {:>7}  {}",
            format_timestamp(event.start()),
            format_timestamp(event.end()),
            format_duration(event.duration_ms()),
            event.description()
        )?;
    }
    Ok(())
}

//! Recent command for showing the most recently started event.

use std::io::Write;

use anyhow::Result;
use nt_core::{EventStore, Tracker};

/// Runs the recent command.
pub fn run<W: Write, S: EventStore>(writer: &mut W, tracker: &Tracker<S>, json: bool) -> Result<()> {
    let recent = tracker.most_recent_event()?;

    if json {
        writeln!(writer, "{}", serde_json::to_string(&recent)?)?;
        return Ok(());
    }

    match recent {
        Some(event) => writeln!(writer, "Most recent: {event}")?,
        None => writeln!(writer, "No events recorded.")?,
    }
    Ok(())
}

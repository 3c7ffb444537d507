//! Summary command for showing time spent per activity.

use std::collections::BTreeSet;
use std::io::Write;

use anyhow::Result;
use nt_core::{AggregateEvent, EventStore, Interval, Tracker, format_timestamp};
use serde::Serialize;

use super::util::{describe_window, format_duration};

/// JSON view of an aggregate.
#[derive(Debug, Serialize)]
pub struct AggregateJson<'a> {
    pub description: &'a str,
    pub total_duration_ms: u64,
    pub latest_start: i64,
    pub occurrences: usize,
    pub intervals: &'a BTreeSet<Interval>,
}

impl<'a> From<&'a AggregateEvent> for AggregateJson<'a> {
    fn from(aggregate: &'a AggregateEvent) -> Self {
        Self {
            description: aggregate.description(),
            total_duration_ms: aggregate.total_duration_ms(),
            latest_start: aggregate.latest_start(),
            occurrences: aggregate.intervals().len(),
            intervals: aggregate.intervals(),
        }
    }
}

/// Runs the summary command, listing activities from longest to shortest.
pub fn run<W: Write, S: EventStore>(
    writer: &mut W,
    tracker: &Tracker<S>,
    window: &Interval,
    json: bool,
) -> Result<()> {
    let aggregates = tracker.aggregate_events_in_interval(window)?;

    if json {
        let entries: Vec<AggregateJson<'_>> = aggregates.iter().rev().map(AggregateJson::from).collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }

    writeln!(writer, "Summary for {}", describe_window(window))?;
    if aggregates.is_empty() {
        writeln!(writer, "No events recorded.")?;
        return Ok(());
    }

    let total: u64 = aggregates
        .iter()
        .map(AggregateEvent::total_duration_ms)
        .fold(0, u64::saturating_add);
    for aggregate in aggregates.iter().rev() {
        let occurrences = aggregate.intervals().len();
        writeln!(
            writer,
            "{:>7}  {} ({} {}, last started {})",
            format_duration(aggregate.total_duration_ms()),
            aggregate.description(),
            occurrences,
            if occurrences == 1 { "time" } else { "times" },
            format_timestamp(aggregate.latest_start()),
        )?;
    }
    writeln!(writer, "Total: {}", format_duration(total))?;
    Ok(())
}

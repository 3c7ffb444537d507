//! Aggregation of repeated events into a single ranked activity.
//!
//! An [`AggregateEvent`] collects every occurrence of one description within a
//! query window. Aggregates rank by total duration; when two activities took
//! the same time, the one that happened most recently wins.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use crate::event::Event;
use crate::interval::Interval;

/// All occurrences of a single event description.
///
/// Instances are immutable once built; use [`AggregateBuilder`] to create them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregateEvent {
    description: String,
    /// Sorted by start time ascending, then by duration ascending.
    intervals: BTreeSet<Interval>,
}

impl AggregateEvent {
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Intervals in which the event happened, sorted by start time.
    pub const fn intervals(&self) -> &BTreeSet<Interval> {
        &self.intervals
    }

    /// Sum of the durations of all occurrences, in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.intervals
            .iter()
            .fold(0_u64, |total, interval| total.saturating_add(interval.duration_ms()))
    }

    /// Start of the latest occurrence.
    ///
    /// Among occurrences starting at the same instant, the longest one is
    /// considered the latest.
    pub fn latest_start(&self) -> i64 {
        self.intervals.last().map_or(i64::MIN, Interval::start)
    }
}

impl Ord for AggregateEvent {
    /// Orders by total duration, then by latest start.
    ///
    /// Aggregates that still tie are ordered by their contents so that
    /// `Ordering::Equal` implies structural equality.
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_duration_ms()
            .cmp(&other.total_duration_ms())
            .then_with(|| self.latest_start().cmp(&other.latest_start()))
            .then_with(|| self.description.cmp(&other.description))
            .then_with(|| self.intervals.cmp(&other.intervals))
    }
}

impl PartialOrd for AggregateEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for AggregateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.description)?;
        for interval in &self.intervals {
            write!(f, " {interval}")?;
        }
        Ok(())
    }
}

/// Accumulates occurrences of one event before producing an [`AggregateEvent`].
///
/// The first event fixes the description; every accumulated event must share it.
#[derive(Debug, Clone)]
pub struct AggregateBuilder {
    description: String,
    intervals: Vec<Interval>,
}

impl AggregateBuilder {
    pub fn new(first: Event) -> Self {
        Self {
            intervals: vec![first.interval()],
            description: first.description().to_owned(),
        }
    }

    /// Adds another occurrence of the event being aggregated.
    pub fn accumulate(&mut self, event: Event) -> &mut Self {
        debug_assert_eq!(
            self.description,
            event.description(),
            "aggregated events must share a description"
        );
        self.intervals.push(event.interval());
        self
    }

    /// Produces an aggregate from everything accumulated so far.
    pub fn build(&self) -> AggregateEvent {
        let mut intervals = BTreeSet::new();
        for interval in &self.intervals {
            let inserted = intervals.insert(*interval);
            debug_assert!(
                inserted,
                "duplicate interval {interval} in aggregate {}",
                self.description
            );
        }
        AggregateEvent {
            description: self.description.clone(),
            intervals,
        }
    }
}

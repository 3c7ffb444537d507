//! Persistence contract consumed by the [`Tracker`](crate::Tracker).

use std::collections::HashSet;

use crate::error::TrackerError;
use crate::event::Event;
use crate::interval::Interval;

/// Durable set of non-overlapping events.
///
/// Implementations are single-writer: callers must not issue concurrent
/// writes against the same store, but `put` must still be atomic with respect
/// to other handles on the same backing storage.
pub trait EventStore {
    /// Records a new event.
    ///
    /// Fails with [`TrackerError::BadEvent`] if the event would intersect any
    /// stored event, including one that merely touches it. A failed call
    /// leaves the store unchanged.
    fn put(&mut self, event: &Event) -> Result<(), TrackerError>;

    /// Fetches the events that intersect `interval`.
    ///
    /// A stored event matches when its start or its end falls within
    /// `[interval.start, interval.end)`. Matching events are clipped to the
    /// part that lies inside `interval`. With a `limit`, only the events with
    /// the latest start times are returned.
    fn query(&self, interval: &Interval, limit: Option<u64>) -> Result<HashSet<Event>, TrackerError>;
}

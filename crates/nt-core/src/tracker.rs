//! Query and command facade over an [`EventStore`].

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::aggregate::{AggregateBuilder, AggregateEvent};
use crate::error::TrackerError;
use crate::event::Event;
use crate::interval::Interval;
use crate::store::EventStore;

/// Records events and answers range queries over them.
///
/// The tracker owns its store; construct one store per backing database and
/// hand it over explicitly.
#[derive(Debug)]
pub struct Tracker<S> {
    store: S,
}

impl<S: EventStore> Tracker<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Records a new event spanning `[start_ms, end_ms]`.
    ///
    /// Malformed input and overlaps with existing events are reported as
    /// [`TrackerError::BadEvent`].
    pub fn add_event(
        &mut self,
        start_ms: i64,
        end_ms: i64,
        description: impl Into<String>,
    ) -> Result<(), TrackerError> {
        let interval = Interval::new(start_ms, end_ms)?;
        let event = Event::new(interval, description)?;
        self.store.put(&event)
    }

    /// Returns all events within `interval`.
    ///
    /// Events that cross the boundaries of `interval` are cut to fit, so the
    /// result may not match the events as they were recorded.
    pub fn events_in_interval(&self, interval: &Interval) -> Result<HashSet<Event>, TrackerError> {
        let events = self.store.query(interval, None)?;
        tracing::debug!(%interval, count = events.len(), "queried events");
        Ok(events)
    }

    /// Returns the events within `interval` grouped by description.
    ///
    /// The result is sorted from the least to the most relevant activity; see
    /// [`AggregateEvent`] for the ranking rules.
    pub fn aggregate_events_in_interval(
        &self,
        interval: &Interval,
    ) -> Result<BTreeSet<AggregateEvent>, TrackerError> {
        // Group in memory: clipped intervals only exist after the query.
        let mut builders: HashMap<String, AggregateBuilder> = HashMap::new();
        for event in self.events_in_interval(interval)? {
            match builders.entry(event.description().to_owned()) {
                Entry::Occupied(mut entry) => {
                    entry.get_mut().accumulate(event);
                }
                Entry::Vacant(entry) => {
                    entry.insert(AggregateBuilder::new(event));
                }
            }
        }

        let aggregates: BTreeSet<AggregateEvent> =
            builders.values().map(AggregateBuilder::build).collect();
        debug_assert_eq!(aggregates.len(), builders.len());
        Ok(aggregates)
    }

    /// Returns the activity that took the most time within `interval`.
    ///
    /// Ties go to the activity that happened most recently. Returns `None`
    /// when the window holds no events.
    pub fn top_event_in_interval(
        &self,
        interval: &Interval,
    ) -> Result<Option<AggregateEvent>, TrackerError> {
        let mut aggregates = self.aggregate_events_in_interval(interval)?;
        Ok(aggregates.pop_last())
    }

    /// Returns the stored event with the latest start time.
    pub fn most_recent_event(&self) -> Result<Option<Event>, TrackerError> {
        let events = self.store.query(&Interval::FOREVER, Some(1))?;
        Ok(events.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Store that records the queries it receives and returns canned events.
    #[derive(Default)]
    struct RecordingStore {
        events: Vec<Event>,
        queries: RefCell<Vec<(Interval, Option<u64>)>>,
    }

    impl EventStore for RecordingStore {
        fn put(&mut self, event: &Event) -> Result<(), TrackerError> {
            self.events.push(event.clone());
            Ok(())
        }

        fn query(
            &self,
            interval: &Interval,
            limit: Option<u64>,
        ) -> Result<HashSet<Event>, TrackerError> {
            self.queries.borrow_mut().push((*interval, limit));
            Ok(self.events.iter().cloned().collect())
        }
    }

    fn event(start: i64, end: i64, description: &str) -> Event {
        Event::new(Interval::new(start, end).unwrap(), description).unwrap()
    }

    #[test]
    fn add_event_rejects_inverted_interval_before_touching_the_store() {
        let mut tracker = Tracker::new(RecordingStore::default());
        let err = tracker.add_event(10, 5, "Backwards").unwrap_err();
        assert!(matches!(err, TrackerError::BadEvent(_)));
        assert!(tracker.store().events.is_empty());
    }

    #[test]
    fn add_event_rejects_empty_description() {
        let mut tracker = Tracker::new(RecordingStore::default());
        let err = tracker.add_event(1, 5, "").unwrap_err();
        assert!(err.to_string().contains("description cannot be empty"));
        assert!(tracker.store().events.is_empty());
    }

    #[test]
    fn add_event_forwards_valid_events() {
        let mut tracker = Tracker::new(RecordingStore::default());
        tracker.add_event(1, 5, "Work").unwrap();
        assert_eq!(tracker.into_store().events, vec![event(1, 5, "Work")]);
    }

    #[test]
    fn events_in_interval_queries_without_limit() {
        let tracker = Tracker::new(RecordingStore::default());
        let window = Interval::new(0, 100).unwrap();
        tracker.events_in_interval(&window).unwrap();
        assert_eq!(*tracker.store().queries.borrow(), vec![(window, None)]);
    }

    #[test]
    fn most_recent_event_queries_forever_with_limit_one() {
        let tracker = Tracker::new(RecordingStore::default());
        assert_eq!(tracker.most_recent_event().unwrap(), None);
        assert_eq!(
            *tracker.store().queries.borrow(),
            vec![(Interval::FOREVER, Some(1))]
        );
    }

    #[test]
    fn aggregates_group_by_description() {
        let store = RecordingStore {
            events: vec![
                event(0, 1, "One"),
                event(2, 3, "One"),
                event(4, 5, "Two"),
                event(6, 9, "Two"),
                event(10, 11, "Three"),
            ],
            ..RecordingStore::default()
        };
        let tracker = Tracker::new(store);

        let aggregates = tracker
            .aggregate_events_in_interval(&Interval::FOREVER)
            .unwrap();
        let summary: Vec<(String, u64)> = aggregates
            .iter()
            .map(|a| (a.description().to_owned(), a.total_duration_ms()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Three".to_owned(), 1),
                ("One".to_owned(), 2),
                ("Two".to_owned(), 4),
            ]
        );

        let top = tracker.top_event_in_interval(&Interval::FOREVER).unwrap();
        assert_eq!(top.map(|a| a.description().to_owned()), Some("Two".to_owned()));
    }

    #[test]
    fn top_event_is_none_without_events() {
        let tracker = Tracker::new(RecordingStore::default());
        assert_eq!(tracker.top_event_in_interval(&Interval::FOREVER).unwrap(), None);
        assert!(
            tracker
                .aggregate_events_in_interval(&Interval::FOREVER)
                .unwrap()
                .is_empty()
        );
    }
}

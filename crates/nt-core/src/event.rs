//! Events recorded by the user.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::interval::Interval;

/// A described interval of time, like a calendar entry in the past.
///
/// Equality and hashing are structural, so two events with the same
/// description but different intervals are distinct records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "EventParts")]
pub struct Event {
    interval: Interval,
    description: String,
}

#[derive(Deserialize)]
struct EventParts {
    interval: Interval,
    description: String,
}

impl TryFrom<EventParts> for Event {
    type Error = ValidationError;

    fn try_from(parts: EventParts) -> Result<Self, Self::Error> {
        Self::new(parts.interval, parts.description)
    }
}

impl Event {
    /// Creates a new event. The description cannot be empty.
    pub fn new(interval: Interval, description: impl Into<String>) -> Result<Self, ValidationError> {
        let description = description.into();
        if description.is_empty() {
            return Err(ValidationError::InvalidEvent {
                field: "description",
            });
        }
        Ok(Self {
            interval,
            description,
        })
    }

    pub const fn interval(&self) -> Interval {
        self.interval
    }

    pub const fn start(&self) -> i64 {
        self.interval.start()
    }

    pub const fn end(&self) -> i64 {
        self.interval.end()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Length of the event in milliseconds.
    pub const fn duration_ms(&self) -> u64 {
        self.interval.duration_ms()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.interval, self.description)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn interval(start: i64, end: i64) -> Interval {
        Interval::new(start, end).unwrap()
    }

    #[test]
    fn new_keeps_interval_and_description() {
        let event = Event::new(interval(10, 25), "Writing").unwrap();
        assert_eq!(event.interval(), interval(10, 25));
        assert_eq!(event.start(), 10);
        assert_eq!(event.end(), 25);
        assert_eq!(event.description(), "Writing");
        assert_eq!(event.duration_ms(), 15);
    }

    #[test]
    fn new_rejects_empty_description() {
        assert_eq!(
            Event::new(interval(0, 1), ""),
            Err(ValidationError::InvalidEvent {
                field: "description"
            })
        );
    }

    #[test]
    fn equality_is_structural() {
        let a = Event::new(interval(0, 10), "A").unwrap();
        let a_bis = Event::new(interval(0, 10), "A").unwrap();
        let a_later = Event::new(interval(20, 30), "A").unwrap();
        let b = Event::new(interval(0, 10), "B").unwrap();

        assert_eq!(a, a_bis);
        assert_ne!(a, a_later);
        assert_ne!(a, b);

        let set: HashSet<Event> = [a, a_bis, a_later, b].into_iter().collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn display_includes_interval_and_description() {
        let event = Event::new(interval(0, 1_000), "Reading").unwrap();
        assert_eq!(
            event.to_string(),
            "1970-01-01T00:00:00.000Z/1970-01-01T00:00:01.000Z: Reading"
        );
    }

    #[test]
    fn event_serialization_roundtrip() {
        let event = Event::new(interval(5, 8), "Coffee").unwrap();
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"interval":{"start":5,"end":8},"description":"Coffee"}"#
        );
        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn event_rejects_empty_description_on_deserialize() {
        let json = r#"{"interval":{"start":5,"end":8},"description":""}"#;
        let result: Result<Event, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}

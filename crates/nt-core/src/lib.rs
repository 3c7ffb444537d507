//! Core domain logic for the nudgy timer.
//!
//! This crate contains the fundamental types and logic for:
//! - Intervals and events: validated, immutable records of described time
//! - Aggregation: grouping events by description and ranking the results
//! - Tracking: the [`Tracker`] facade over any [`EventStore`] implementation

mod aggregate;
mod error;
mod event;
pub mod interval;
mod store;
mod tracker;

pub use aggregate::{AggregateBuilder, AggregateEvent};
pub use error::{TrackerError, ValidationError};
pub use event::Event;
pub use interval::{Interval, format_timestamp};
pub use store::EventStore;
pub use tracker::Tracker;

//! Storage layer for the nudgy timer.
//!
//! Provides a durable [`EventStore`] backed by `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! This means a `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization. The tracker assumes a single
//! writer; writes still take the SQLite write lock up front so that other processes
//! sharing the file cannot slip a conflicting event in between the overlap check
//! and the insert.
//!
//! # Schema
//!
//! A single `events` table holds one row per recorded event. Bounds are stored as
//! INTEGER milliseconds since the Unix epoch and are each declared `UNIQUE`.
//!
//! The schema version lives in `PRAGMA user_version`. A fresh database (version 0)
//! is initialized on open; any other version that does not match
//! [`SCHEMA_VERSION`] is rejected because no migrations exist.

use std::collections::HashSet;
use std::path::Path;

use nt_core::{Event, EventStore, Interval, TrackerError};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use thiserror::Error;

/// Version of the schema created by this crate.
///
/// Any change to the schema requires bumping this by one.
pub const SCHEMA_VERSION: i64 = 1;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The database was written by a different schema version.
    #[error("unsupported schema version {found} (expected {expected}); upgrades are not implemented")]
    UnsupportedSchemaVersion { found: i64, expected: i64 },
    /// The event intersects an event that is already stored.
    #[error(
        "cannot put new event {event} because it would overlap other events in the store; one of them is: {existing}"
    )]
    WouldOverlap { event: Event, existing: Event },
    /// Stored data violates an invariant this crate maintains.
    #[error("corrupt store: {0}")]
    Corrupt(String),
}

impl From<DbError> for TrackerError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::WouldOverlap { .. } => Self::BadEvent(err.to_string()),
            DbError::Corrupt(message) => Self::CorruptStore(message),
            DbError::Sqlite(_) | DbError::UnsupportedSchemaVersion { .. } => {
                Self::Storage(Box::new(err))
            }
        }
    }
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let mut db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Creates the schema on a fresh database or validates an existing one.
    fn init(&mut self) -> Result<(), DbError> {
        match self.schema_version()? {
            0 => {
                let tx = self.conn.transaction()?;
                tx.execute_batch(
                    "
                    -- start_millis/end_millis: milliseconds since the Unix epoch
                    CREATE TABLE IF NOT EXISTS events (
                        id INTEGER PRIMARY KEY,
                        start_millis INTEGER NOT NULL UNIQUE,
                        end_millis INTEGER NOT NULL UNIQUE,
                        description TEXT NOT NULL
                    );
                    ",
                )?;
                tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
                tx.commit()?;
                tracing::debug!(version = SCHEMA_VERSION, "initialized database schema");
                Ok(())
            }
            SCHEMA_VERSION => Ok(()),
            found => Err(DbError::UnsupportedSchemaVersion {
                found,
                expected: SCHEMA_VERSION,
            }),
        }
    }

    /// Returns the schema version recorded in the database.
    pub fn schema_version(&self) -> Result<i64, DbError> {
        let version = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    /// Counts the stored events.
    pub fn count_events(&self) -> Result<u64, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        u64::try_from(count).map_err(|_| DbError::Corrupt(format!("negative event count {count}")))
    }

    /// Stores a new event and returns its row ID.
    ///
    /// The event is rejected if it shares any instant with a stored event,
    /// which includes starting exactly where another one ends. The check and
    /// the insert run in one transaction; on failure nothing is written.
    pub fn put_event(&mut self, event: &Event) -> Result<i64, DbError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(existing) = find_conflict(&tx, event.interval())? {
            tracing::warn!(%event, %existing, "rejected overlapping event");
            return Err(DbError::WouldOverlap {
                event: event.clone(),
                existing,
            });
        }

        let inserted = tx.execute(
            "INSERT INTO events (start_millis, end_millis, description) VALUES (?1, ?2, ?3)",
            params![event.start(), event.end(), event.description()],
        )?;
        if inserted != 1 {
            tracing::warn!(%event, inserted, "failed to put event");
            return Err(DbError::Corrupt(format!("failed to put event {event}")));
        }
        let id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::info!(id, %event, "put new event");
        Ok(id)
    }

    /// Lists the events that intersect `interval`, clipped to it.
    ///
    /// An event matches when its start falls within
    /// `[interval.start, interval.end)` or its end falls within
    /// `(interval.start, interval.end)`. A record that ends exactly where the
    /// window begins shares no time with it and is left out. Results are taken
    /// in descending start order before `limit` applies.
    pub fn query_events(
        &self,
        interval: &Interval,
        limit: Option<u64>,
    ) -> Result<HashSet<Event>, DbError> {
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));
        let mut stmt = self.conn.prepare(
            "
            SELECT start_millis, end_millis, description
            FROM events
            WHERE (start_millis >= ?1 AND start_millis < ?2)
               OR (end_millis > ?1 AND end_millis < ?2)
            ORDER BY start_millis DESC
            LIMIT ?3
            ",
        )?;
        let rows = stmt.query_map(params![interval.start(), interval.end(), limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut events = HashSet::new();
        for row in rows {
            let (start, end, description) = row?;
            let stored = stored_interval(start, end)?;
            let clipped = stored.overlap(interval).ok_or_else(|| {
                DbError::Corrupt(format!(
                    "fetched event {stored} is outside of the query interval {interval}"
                ))
            })?;
            let event = stored_event(clipped, description)?;
            if events.contains(&event) {
                return Err(DbError::Corrupt(format!(
                    "event {event} should be unique but got a duplicate"
                )));
            }
            events.insert(event);
        }
        Ok(events)
    }
}

impl EventStore for Database {
    fn put(&mut self, event: &Event) -> Result<(), TrackerError> {
        self.put_event(event)?;
        Ok(())
    }

    fn query(&self, interval: &Interval, limit: Option<u64>) -> Result<HashSet<Event>, TrackerError> {
        Ok(self.query_events(interval, limit)?)
    }
}

/// Finds a stored event sharing at least one instant with `interval`.
fn find_conflict(conn: &Connection, interval: Interval) -> Result<Option<Event>, DbError> {
    let row = conn
        .query_row(
            "
            SELECT start_millis, end_millis, description
            FROM events
            WHERE start_millis <= ?2 AND end_millis >= ?1
            ORDER BY start_millis DESC
            LIMIT 1
            ",
            params![interval.start(), interval.end()],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()?;

    row.map(|(start, end, description)| stored_event(stored_interval(start, end)?, description))
        .transpose()
}

fn stored_interval(start: i64, end: i64) -> Result<Interval, DbError> {
    Interval::new(start, end).map_err(|err| DbError::Corrupt(format!("bad event in store: {err}")))
}

fn stored_event(interval: Interval, description: String) -> Result<Event, DbError> {
    Event::new(interval, description)
        .map_err(|err| DbError::Corrupt(format!("bogus event in store: {err}")))
}

//! Status command for showing the state of the event database.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use nt_core::Tracker;
use nt_db::Database;

pub fn run<W: Write>(writer: &mut W, tracker: &Tracker<Database>, database_path: &Path) -> Result<()> {
    let db = tracker.store();

    writeln!(writer, "Nudgy timer status")?;
    writeln!(writer, "Database: {}", database_path.display())?;
    writeln!(writer, "Schema version: {}", db.schema_version()?)?;
    writeln!(writer, "Events: {}", db.count_events()?)?;

    match tracker.most_recent_event()? {
        Some(event) => writeln!(writer, "Most recent: {event}")?,
        None => writeln!(writer, "No events recorded.")?,
    }
    Ok(())
}

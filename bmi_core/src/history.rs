//! Computation history backed by SQLite.
//!
//! Entries live in a single `items` table. Creation time is stored as a
//! Julian day (`julianday('now')`) and read back as a calendar date.

use crate::{EntryId, HistoryEntry, Result};
use rusqlite::{params, Connection, Row};
use std::io::Write;
use std::path::Path;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY NOT NULL,
    done INT,
    value TEXT,
    itemDate REAL
);";

const DROP_TABLE_SQL: &str = "DROP TABLE IF EXISTS items;";

/// History log trait for recording computations
pub trait HistoryLog {
    /// Prepare the log for a new application launch, optionally clearing it
    fn initialize(&mut self, reset: bool) -> Result<()>;

    /// Record a label; empty or missing labels are ignored and yield `None`
    fn append(&mut self, label: Option<&str>) -> Result<Option<EntryId>>;

    /// Snapshot of all entries, newest first
    fn list(&self) -> Result<Vec<HistoryEntry>>;

    /// Delete an entry; removing an unknown id is not an error
    fn remove(&mut self, id: EntryId) -> Result<()>;
}

/// SQLite-based history log
pub struct SqliteHistory {
    conn: Connection,
}

impl SqliteHistory {
    /// Open (or create) a history database at the given path.
    ///
    /// Existing entries are kept; call `initialize` to apply the startup policy.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let history = Self { conn };
        history.ensure_table()?;
        tracing::debug!("Opened history database at {:?}", path);
        Ok(history)
    }

    /// Create an in-memory history (for testing or ephemeral runs)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let history = Self { conn };
        history.ensure_table()?;
        Ok(history)
    }

    fn ensure_table(&self) -> Result<()> {
        self.conn.execute_batch(CREATE_TABLE_SQL)?;
        Ok(())
    }

    fn insert(&self, label: &str, julian_day_sql: &str) -> Result<EntryId> {
        let sql = format!(
            "INSERT INTO items (done, value, itemDate) VALUES (0, ?1, {})",
            julian_day_sql
        );
        self.conn.execute(&sql, params![label])?;
        Ok(self.conn.last_insert_rowid())
    }

    #[cfg(test)]
    fn insert_at(&self, label: &str, julian_day: f64) -> Result<EntryId> {
        self.insert(label, &format!("{:.8}", julian_day))
    }
}

fn row_to_entry(row: &Row) -> rusqlite::Result<HistoryEntry> {
    let done: Option<i64> = row.get("done")?;
    let value: Option<String> = row.get("value")?;
    let date: Option<String> = row.get("itemDay")?;

    Ok(HistoryEntry {
        id: row.get("id")?,
        done: done.unwrap_or(0) != 0,
        value: value.unwrap_or_default(),
        created_at: row.get::<_, Option<f64>>("itemDate")?.unwrap_or_default(),
        date: date.unwrap_or_default(),
    })
}

impl HistoryLog for SqliteHistory {
    fn initialize(&mut self, reset: bool) -> Result<()> {
        if reset {
            self.conn.execute_batch(DROP_TABLE_SQL)?;
            tracing::info!("Cleared computation history");
        }
        self.ensure_table()
    }

    fn append(&mut self, label: Option<&str>) -> Result<Option<EntryId>> {
        let label = match label {
            Some(label) if !label.is_empty() => label,
            _ => {
                tracing::debug!("Ignoring empty history label");
                return Ok(None);
            }
        };

        let id = self.insert(label, "julianday('now')")?;
        tracing::debug!("Appended history entry {}", id);
        Ok(Some(id))
    }

    fn list(&self) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, done, value, itemDate, date(itemDate) AS itemDay
             FROM items
             ORDER BY itemDate DESC, id DESC",
        )?;
        let entries = stmt
            .query_map([], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!("Read {} history entries", entries.len());
        Ok(entries)
    }

    fn remove(&mut self, id: EntryId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1", params![id])?;
        tracing::debug!("Removed {} history entries with id {}", deleted, id);
        Ok(())
    }
}

/// A row in the CSV export
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    id: EntryId,
    date: &'a str,
    created_at: String,
    done: bool,
    value: &'a str,
}

impl<'a> From<&'a HistoryEntry> for CsvRow<'a> {
    fn from(entry: &'a HistoryEntry) -> Self {
        CsvRow {
            id: entry.id,
            date: &entry.date,
            created_at: entry
                .created_at_utc()
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            done: entry.done,
            value: &entry.value,
        }
    }
}

const CSV_HEADERS: [&str; 5] = ["id", "date", "created_at", "done", "value"];

/// Write entries as CSV and return the number of rows written.
///
/// The header row is written even when there are no entries.
pub fn write_csv<W: Write>(entries: &[HistoryEntry], writer: W) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(CSV_HEADERS)?;
    for entry in entries {
        writer.serialize(CsvRow::from(entry))?;
    }
    writer.flush()?;

    Ok(entries.len())
}

//! SQLite activity journal.
//!
//! RULE: Only journal.rs talks to the database.
//! The session hands it finished events; it never sees live tables.

use crate::{
    error::{LedgerError, LedgerResult},
    event::{JournalEntry, LedgerEvent},
};
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection};

pub struct JournalStore {
    conn: Connection,
}

impl JournalStore {
    /// Open (or create) the journal database at `path`.
    pub fn open(path: &str) -> LedgerResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: the runner may be inspected while it writes.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory journal (used in tests and when no path is configured).
    pub fn in_memory() -> LedgerResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> LedgerResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_journal.sql"))?;
        Ok(())
    }

    pub fn record(&self, session_id: &str, sheet: &str, event: &LedgerEvent) -> LedgerResult<()> {
        let entry = JournalEntry {
            id:          None,
            session_id:  session_id.to_string(),
            sheet:       sheet.to_string(),
            event_type:  event.type_name().to_string(),
            payload:     serde_json::to_string(event)?,
            recorded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        };
        self.append(&entry)
    }

    pub fn append(&self, entry: &JournalEntry) -> LedgerResult<()> {
        self.conn.execute(
            "INSERT INTO journal (session_id, sheet, event_type, payload, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.session_id,
                entry.sheet,
                entry.event_type,
                entry.payload,
                entry.recorded_at,
            ],
        )?;
        Ok(())
    }

    pub fn entries_for_sheet(&self, sheet: &str) -> LedgerResult<Vec<JournalEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, sheet, event_type, payload, recorded_at
             FROM journal WHERE sheet = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![sheet], |row| {
                Ok(JournalEntry {
                    id:          Some(row.get(0)?),
                    session_id:  row.get(1)?,
                    sheet:       row.get(2)?,
                    event_type:  row.get(3)?,
                    payload:     row.get(4)?,
                    recorded_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn entry_count(&self) -> LedgerResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM journal", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Decode the events recorded for a sheet, oldest first.
    pub fn events_for_sheet(&self, sheet: &str) -> LedgerResult<Vec<LedgerEvent>> {
        self.entries_for_sheet(sheet)?
            .iter()
            .map(|e| serde_json::from_str::<LedgerEvent>(&e.payload).map_err(LedgerError::from))
            .collect()
    }
}

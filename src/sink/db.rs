use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use super::Sink;
use crate::entries::{Entries, View};
use crate::error::Result;

pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS entries (
            id            INTEGER PRIMARY KEY,
            source        TEXT NOT NULL,
            position      INTEGER NOT NULL,
            month         TEXT NOT NULL,
            month_number  INTEGER NOT NULL CHECK(month_number BETWEEN 1 AND 12),
            day           INTEGER NOT NULL CHECK(day BETWEEN 1 AND 31),
            title         TEXT NOT NULL,
            verse_text    TEXT NOT NULL,
            reference     TEXT,
            book          TEXT,
            chapter       INTEGER,
            verse_start   INTEGER,
            verse_end     INTEGER,
            verse         TEXT NOT NULL,
            body          TEXT NOT NULL,
            strategy      TEXT CHECK(strategy IN ('inline','split','fallback')),
            created_at    TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(source, position)
        );
        CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(month_number, day);
        CREATE INDEX IF NOT EXISTS idx_entries_book ON entries(book);
        ",
    )?;
    Ok(())
}

/// Replace every row of `source` with `entries`, in the order of `view`.
pub fn save_entries(conn: &Connection, source: &str, entries: &Entries, view: View) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        tx.execute("DELETE FROM entries WHERE source = ?1", [source])?;
        let mut stmt = tx.prepare(
            "INSERT INTO entries
             (source, position, month, month_number, day, title, verse_text, reference,
              book, chapter, verse_start, verse_end, verse, body, strategy)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15)",
        )?;
        for (position, e) in entries.ordered(view).into_iter().enumerate() {
            let r = e.reference.as_ref();
            count += stmt.execute(rusqlite::params![
                source,
                position as i64,
                e.month,
                e.month_number,
                e.day,
                e.title,
                e.verse_text,
                r.map(|r| r.to_string()),
                r.map(|r| r.book.as_str()),
                r.map(|r| r.chapter),
                r.map(|r| r.verse),
                r.and_then(|r| r.verse_end),
                e.verse,
                e.body,
                e.strategy.map(|s| s.as_str()),
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

/// Persists into the `entries` table, keyed by source document name.
pub struct SqliteSink {
    conn: Connection,
    source: String,
}

impl SqliteSink {
    pub fn open(path: &Path, source: &str) -> Result<Self> {
        let conn = connect(path)?;
        init_schema(&conn)?;
        Ok(SqliteSink {
            conn,
            source: source.to_string(),
        })
    }
}

impl Sink for SqliteSink {
    fn write(&mut self, entries: &Entries, view: View) -> Result<usize> {
        let n = save_entries(&self.conn, &self.source, entries, view)?;
        info!(rows = n, source = %self.source, "saved entries");
        Ok(n)
    }
}

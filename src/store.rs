use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::error::{Error, Result};
use crate::system::sample::SystemSample;

pub type SessionId = i64;

/// One row of the `sessions` table. The end timestamp is absent while the
/// session is still open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: SessionId,
    pub start_time: String,
    pub end_time: Option<String>,
}

/// One persisted sample, raw byte counts as written. Display conversion
/// never touches these values.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    pub id: i64,
    pub session_id: SessionId,
    pub timestamp: String,
    pub cpu: f64,
    pub ram_free: u64,
    pub ram_total: u64,
    pub swap_free: u64,
    pub swap_total: u64,
}

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    start_time TEXT,
    end_time TEXT
);
CREATE TABLE IF NOT EXISTS system_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id INTEGER,
    timestamp TEXT,
    cpu REAL,
    ram_free REAL,
    ram_total REAL,
    swap_free REAL,
    swap_total REAL,
    FOREIGN KEY (session_id) REFERENCES sessions (id)
);
";

/// Owns the SQLite connection and all schema/query logic. Sessions and
/// samples are only ever created through this type; timestamps come from
/// SQLite's own clock at write time.
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    /// Opens (creating if absent) the database at `path` and initializes
    /// the schema. Safe to call on every startup.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(SessionStore { conn })
    }

    /// In-memory store for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(SessionStore { conn })
    }

    /// Inserts a new open session and returns its freshly assigned id.
    /// AUTOINCREMENT guarantees ids are never reused.
    pub fn open_session(&self) -> Result<SessionId> {
        self.conn.execute(
            "INSERT INTO sessions (start_time) VALUES (datetime('now'))",
            [],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(session_id = id, "session opened");
        Ok(id)
    }

    /// Sets the end timestamp on an open session. Closing an id that was
    /// never created is reported as `SessionNotFound` rather than silently
    /// succeeding.
    pub fn close_session(&self, id: SessionId) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE sessions SET end_time = datetime('now') WHERE id = ?1",
            params![id],
        )?;
        if updated == 0 {
            return Err(Error::SessionNotFound(id));
        }
        debug!(session_id = id, "session closed");
        Ok(())
    }

    /// Appends one sample row tagged with `session_id`. The caller (the
    /// recorder) guarantees the session exists and is open.
    pub fn insert_sample(&self, session_id: SessionId, sample: &SystemSample) -> Result<()> {
        self.conn.execute(
            "INSERT INTO system_data \
             (session_id, timestamp, cpu, ram_free, ram_total, swap_free, swap_total) \
             VALUES (?1, datetime('now'), ?2, ?3, ?4, ?5, ?6)",
            params![
                session_id,
                f64::from(sample.cpu_percent),
                sample.ram_free as f64,
                sample.ram_total as f64,
                sample.swap_free as f64,
                sample.swap_total as f64,
            ],
        )?;
        Ok(())
    }

    /// All sessions in creation order.
    pub fn sessions(&self) -> Result<Vec<SessionRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, start_time, end_time FROM sessions ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(SessionRecord {
                id: row.get(0)?,
                start_time: row.get(1)?,
                end_time: row.get(2)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// Samples for one session, capture time ascending. The id tiebreak
    /// keeps order stable within the one-second timestamp resolution.
    pub fn samples(&self, session_id: SessionId) -> Result<Vec<SampleRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, timestamp, cpu, ram_free, ram_total, swap_free, swap_total \
             FROM system_data WHERE session_id = ?1 ORDER BY timestamp ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![session_id], |row| {
            Ok(SampleRecord {
                id: row.get(0)?,
                session_id: row.get(1)?,
                timestamp: row.get(2)?,
                cpu: row.get(3)?,
                ram_free: row.get::<_, f64>(4)? as u64,
                ram_total: row.get::<_, f64>(5)? as u64,
                swap_free: row.get::<_, f64>(6)? as u64,
                swap_total: row.get::<_, f64>(7)? as u64,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// Looks up a single session, `None` if the id was never assigned.
    pub fn session(&self, id: SessionId) -> Result<Option<SessionRecord>> {
        self.conn
            .query_row(
                "SELECT id, start_time, end_time FROM sessions WHERE id = ?1",
                params![id],
                |row| {
                    Ok(SessionRecord {
                        id: row.get(0)?,
                        start_time: row.get(1)?,
                        end_time: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(Error::from)
    }
}

//! SQLite-backed event store
//!
//! Participants are persisted as a JSON array so names containing commas
//! survive a round trip. Databases written by the earlier command-line
//! scheduler (no `location` column, comma-joined participants) are
//! migrated in place on open.

use crate::core::error::{Result, ScheduleError};
use crate::core::types::Event;
use crate::store::{ConflictCheck, EventStore, StoreStatus};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::{Duration, Instant};

/// One schema step; `version` is mirrored to `PRAGMA user_version` once applied.
struct Migration {
    version: u32,
    apply: fn(&Connection) -> rusqlite::Result<()>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        apply: create_events_table,
    },
    Migration {
        version: 2,
        apply: add_location_column,
    },
];

const EVENT_SELECT_SQL: &str = "SELECT title, date, time, location, participants FROM events";

/// Event store persisted in a SQLite database
pub struct SqliteEventStore {
    conn: Connection,
}

type EventRow = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

impl SqliteEventStore {
    /// Open (or create) a database file and bootstrap the schema
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        let started_at = Instant::now();
        let conn = Connection::open(path).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to open event database");
            e
        })?;
        let store = Self::bootstrap(conn, busy_timeout)?;
        tracing::info!(
            path = %path.display(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "Event database ready"
        );
        Ok(store)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn, Duration::from_secs(5))
    }

    fn bootstrap(mut conn: Connection, busy_timeout: Duration) -> Result<Self> {
        conn.busy_timeout(busy_timeout)?;
        apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// Close the connection, surfacing any error from pending statements
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| ScheduleError::from(e))
    }
}

/// Highest schema version this build knows how to read
fn latest_schema_version() -> u32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

fn apply_migrations(conn: &mut Connection) -> Result<()> {
    let current: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    let latest = latest_schema_version();

    if current > latest {
        return Err(ScheduleError::ConfigError(format!(
            "event database schema v{} is newer than supported v{}",
            current, latest
        )));
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        (migration.apply)(&tx)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    tracing::info!(from = current, to = latest, "Event database schema migrated");
    Ok(())
}

fn create_events_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            date TEXT,
            time TEXT,
            participants TEXT
        );",
    )
}

fn add_location_column(conn: &Connection) -> rusqlite::Result<()> {
    if !has_column(conn, "events", "location")? {
        conn.execute_batch("ALTER TABLE events ADD COLUMN location TEXT;")?;
    }
    conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_events_slot ON events (date, time);")
}

fn has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names.iter().any(|name| name == column))
}

fn row_to_columns(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn columns_to_event(columns: EventRow) -> Event {
    let (title, date, time, location, participants) = columns;
    let participants = participants
        .filter(|text| !text.is_empty())
        .map(|text| decode_participants(&text));
    Event {
        title,
        date,
        time,
        location,
        participants,
    }
}

/// JSON array, or the comma-joined text older databases hold
fn decode_participants(text: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(text).unwrap_or_else(|_| {
        text.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect()
    })
}

fn participants_json(event: &Event) -> Result<Option<String>> {
    match &event.participants {
        Some(list) => Ok(Some(serde_json::to_string(list)?)),
        None => Ok(None),
    }
}

impl EventStore for SqliteEventStore {
    fn create(&self, event: &Event) -> Result<StoreStatus> {
        if event.slot().is_none() {
            return Ok(StoreStatus::Failed);
        }

        self.conn.execute(
            "INSERT INTO events (title, date, time, location, participants)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                event.title,
                event.date,
                event.time,
                event.location,
                participants_json(event)?
            ],
        )?;
        Ok(StoreStatus::Success)
    }

    fn read(&self, query: &Event) -> Result<Vec<Event>> {
        let sql = format!(
            "{EVENT_SELECT_SQL}
             WHERE (?1 IS NULL OR title = ?1)
               AND (?2 IS NULL OR date = ?2)
               AND (?3 IS NULL OR time = ?3)
               AND (?4 IS NULL OR location = ?4)
             ORDER BY date, time, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![query.title, query.date, query.time, query.location],
                row_to_columns,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows.into_iter().map(columns_to_event).collect())
    }

    fn update(&self, event: &Event) -> Result<StoreStatus> {
        let Some(title) = event.title.as_deref() else {
            return Ok(StoreStatus::Failed);
        };

        let changed = self.conn.execute(
            "UPDATE events
             SET time = COALESCE(?1, time),
                 location = COALESCE(?2, location),
                 participants = COALESCE(?3, participants)
             WHERE title = ?4 AND (?5 IS NULL OR date = ?5)",
            params![
                event.time,
                event.location,
                participants_json(event)?,
                title,
                event.date
            ],
        )?;

        Ok(if changed > 0 {
            StoreStatus::Updated
        } else {
            StoreStatus::Failed
        })
    }

    fn delete(&self, event: &Event) -> Result<StoreStatus> {
        if event.title.is_none() && event.date.is_none() && event.time.is_none() {
            return Ok(StoreStatus::Failed);
        }

        let removed = self.conn.execute(
            "DELETE FROM events
             WHERE (?1 IS NULL OR title = ?1)
               AND (?2 IS NULL OR date = ?2)
               AND (?3 IS NULL OR time = ?3)",
            params![event.title, event.date, event.time],
        )?;

        Ok(if removed > 0 {
            StoreStatus::Deleted
        } else {
            StoreStatus::Failed
        })
    }

    fn check_conflict(&self, event: &Event) -> Result<ConflictCheck> {
        let Some((date, time)) = event.slot() else {
            return Ok(ConflictCheck::clear());
        };

        let sql = format!("{EVENT_SELECT_SQL} WHERE date = ?1 AND time = ?2 ORDER BY id LIMIT 1");
        let existing = self
            .conn
            .query_row(&sql, params![date, time], row_to_columns)
            .optional()?;

        match existing {
            Some(columns) => Ok(ConflictCheck::with(columns_to_event(columns))),
            None => Ok(ConflictCheck::clear()),
        }
    }
}

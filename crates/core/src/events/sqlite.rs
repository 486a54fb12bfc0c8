//! SQLite-backed movie event log.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};
use tracing::warn;

use super::{EventDetails, EventError, EventStore, MovieEvent, MovieEventType};

/// SQLite-backed event store.
pub struct SqliteEventStore {
    conn: Mutex<Connection>,
}

impl SqliteEventStore {
    /// Open (or create) the event log at the given path.
    pub fn new(path: &Path) -> Result<Self, EventError> {
        let conn = Connection::open(path).map_err(|e| EventError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory event store (useful for testing).
    pub fn in_memory() -> Result<Self, EventError> {
        let conn =
            Connection::open_in_memory().map_err(|e| EventError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), EventError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS movie_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                movie_id INTEGER NOT NULL,
                event_type TEXT NOT NULL,
                message TEXT NOT NULL,
                details TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_movie_events_movie ON movie_events(movie_id);
            CREATE INDEX IF NOT EXISTS idx_movie_events_created ON movie_events(created_at);
            "#,
        )
        .map_err(|e| EventError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_event(row: &rusqlite::Row) -> rusqlite::Result<MovieEvent> {
        let type_str: String = row.get(2)?;
        let details_json: Option<String> = row.get(4)?;
        let created_str: String = row.get(5)?;

        let details = details_json.and_then(|json| match serde_json::from_str(&json) {
            Ok(details) => Some(details),
            Err(e) => {
                warn!("Dropping unreadable event details payload: {}", e);
                None
            }
        });

        Ok(MovieEvent {
            id: row.get(0)?,
            movie_id: row.get(1)?,
            event_type: MovieEventType::parse(&type_str)
                .unwrap_or(MovieEventType::StatusChanged),
            message: row.get(3)?,
            details,
            created_at: DateTime::parse_from_rfc3339(&created_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

impl EventStore for SqliteEventStore {
    fn append(
        &self,
        movie_id: i64,
        event_type: MovieEventType,
        message: &str,
        details: Option<&EventDetails>,
    ) -> Result<(), EventError> {
        let details_json = details
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| EventError::Serialization(e.to_string()))?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO movie_events (movie_id, event_type, message, details, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                movie_id,
                event_type.as_str(),
                message,
                details_json,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| EventError::Database(e.to_string()))?;

        Ok(())
    }

    fn list_for_movie(&self, movie_id: i64) -> Result<Vec<MovieEvent>, EventError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, movie_id, event_type, message, details, created_at
                 FROM movie_events WHERE movie_id = ? ORDER BY id ASC",
            )
            .map_err(|e| EventError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![movie_id], Self::row_to_event)
            .map_err(|e| EventError::Database(e.to_string()))?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row.map_err(|e| EventError::Database(e.to_string()))?);
        }
        Ok(events)
    }

    fn delete_older_than(&self, days: u32) -> Result<u64, EventError> {
        let cutoff = (Utc::now() - Duration::days(days as i64)).to_rfc3339();

        let conn = self.conn.lock().unwrap();
        let removed = conn
            .execute(
                "DELETE FROM movie_events WHERE created_at < ?",
                params![cutoff],
            )
            .map_err(|e| EventError::Database(e.to_string()))?;

        Ok(removed as u64)
    }
}

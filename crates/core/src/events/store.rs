//! Event log storage trait.

use thiserror::Error;

use super::{EventDetails, MovieEvent, MovieEventType};

/// Errors for event log operations.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Storage backend for the append-only movie event log.
pub trait EventStore: Send + Sync {
    /// Append an event to a movie's log.
    fn append(
        &self,
        movie_id: i64,
        event_type: MovieEventType,
        message: &str,
        details: Option<&EventDetails>,
    ) -> Result<(), EventError>;

    /// Load all events for a movie, oldest first.
    fn list_for_movie(&self, movie_id: i64) -> Result<Vec<MovieEvent>, EventError>;

    /// Retention sweep: delete events older than the given number of days.
    /// Returns the number of rows removed.
    fn delete_older_than(&self, days: u32) -> Result<u64, EventError>;
}

//! Append-only movie event log.
//!
//! Every step of the search/download workflow appends an event here.
//! Events are never mutated; the only deletion path is the retention
//! sweep which drops events past a configured age.

mod sqlite;
mod store;
mod types;

pub use sqlite::SqliteEventStore;
pub use store::{EventError, EventStore};
pub use types::{EventDetails, MovieEvent, MovieEventType};

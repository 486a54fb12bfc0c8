//! Movie library storage.
//!
//! Holds the persistent record of every movie the user wants tracked,
//! along with its acquisition status. Status transitions are driven by
//! the search orchestrator and by explicit user action only.

mod sqlite;
mod store;
mod types;

pub use sqlite::SqliteMovieStore;
pub use store::{LibraryError, MovieStore, NewMovie};
pub use types::{MediaStatus, Movie};

//! Movie storage trait.

use thiserror::Error;

use super::{MediaStatus, Movie};

/// Errors for movie library operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Movie not found: {0}")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(String),
}

/// Request to add a movie to the library.
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub year: Option<i32>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<i64>,
}

impl NewMovie {
    pub fn new(title: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            title: title.into(),
            year,
            imdb_id: None,
            tmdb_id: None,
        }
    }

    pub fn with_imdb_id(mut self, imdb_id: impl Into<String>) -> Self {
        self.imdb_id = Some(imdb_id.into());
        self
    }

    pub fn with_tmdb_id(mut self, tmdb_id: i64) -> Self {
        self.tmdb_id = Some(tmdb_id);
        self
    }
}

/// Storage backend for the movie library.
pub trait MovieStore: Send + Sync {
    /// Insert a new movie with status `wanted`, returning the stored record.
    fn insert(&self, movie: NewMovie) -> Result<Movie, LibraryError>;

    /// Load a movie by id.
    fn get_by_id(&self, id: i64) -> Result<Movie, LibraryError>;

    /// Load all movies, most recently added first.
    fn get_all(&self) -> Result<Vec<Movie>, LibraryError>;

    /// Persist a movie's mutable fields (status, identifiers, torrent hash).
    fn update(&self, movie: &Movie) -> Result<(), LibraryError>;

    /// Update only the status of a movie.
    fn set_status(&self, id: i64, status: MediaStatus) -> Result<(), LibraryError>;
}

//! SQLite-backed movie library.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{LibraryError, MediaStatus, Movie, MovieStore, NewMovie};

/// SQLite-backed movie store.
pub struct SqliteMovieStore {
    conn: Mutex<Connection>,
}

impl SqliteMovieStore {
    /// Open (or create) the library database at the given path.
    pub fn new(path: &Path) -> Result<Self, LibraryError> {
        let conn = Connection::open(path).map_err(|e| LibraryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory movie store (useful for testing).
    pub fn in_memory() -> Result<Self, LibraryError> {
        let conn =
            Connection::open_in_memory().map_err(|e| LibraryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), LibraryError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                year INTEGER,
                status TEXT NOT NULL DEFAULT 'wanted',
                imdb_id TEXT,
                tmdb_id INTEGER,
                torrent_hash TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_movies_status ON movies(status);
            "#,
        )
        .map_err(|e| LibraryError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_movie(row: &rusqlite::Row) -> rusqlite::Result<Movie> {
        let status_str: String = row.get(3)?;
        let created_str: String = row.get(7)?;
        let updated_str: String = row.get(8)?;

        Ok(Movie {
            id: row.get(0)?,
            title: row.get(1)?,
            year: row.get(2)?,
            status: MediaStatus::parse(&status_str).unwrap_or(MediaStatus::Wanted),
            imdb_id: row.get(4)?,
            tmdb_id: row.get(5)?,
            torrent_hash: row.get(6)?,
            created_at: parse_timestamp(&created_str),
            updated_at: parse_timestamp(&updated_str),
        })
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

const MOVIE_COLUMNS: &str =
    "id, title, year, status, imdb_id, tmdb_id, torrent_hash, created_at, updated_at";

impl MovieStore for SqliteMovieStore {
    fn insert(&self, movie: NewMovie) -> Result<Movie, LibraryError> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO movies (title, year, status, imdb_id, tmdb_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                movie.title,
                movie.year,
                MediaStatus::Wanted.as_str(),
                movie.imdb_id,
                movie.tmdb_id,
                now,
            ],
        )
        .map_err(|e| LibraryError::Database(e.to_string()))?;

        let id = conn.last_insert_rowid();
        let query = format!("SELECT {} FROM movies WHERE id = ?", MOVIE_COLUMNS);
        conn.query_row(&query, params![id], Self::row_to_movie)
            .map_err(|e| LibraryError::Database(e.to_string()))
    }

    fn get_by_id(&self, id: i64) -> Result<Movie, LibraryError> {
        let conn = self.conn.lock().unwrap();
        let query = format!("SELECT {} FROM movies WHERE id = ?", MOVIE_COLUMNS);
        conn.query_row(&query, params![id], Self::row_to_movie)
            .optional()
            .map_err(|e| LibraryError::Database(e.to_string()))?
            .ok_or(LibraryError::NotFound(id))
    }

    fn get_all(&self) -> Result<Vec<Movie>, LibraryError> {
        let conn = self.conn.lock().unwrap();
        let query = format!("SELECT {} FROM movies ORDER BY created_at DESC", MOVIE_COLUMNS);
        let mut stmt = conn
            .prepare(&query)
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_movie)
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        let mut movies = Vec::new();
        for row in rows {
            movies.push(row.map_err(|e| LibraryError::Database(e.to_string()))?);
        }
        Ok(movies)
    }

    fn update(&self, movie: &Movie) -> Result<(), LibraryError> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        let changed = conn
            .execute(
                "UPDATE movies
                 SET title = ?1, year = ?2, status = ?3, imdb_id = ?4, tmdb_id = ?5,
                     torrent_hash = ?6, updated_at = ?7
                 WHERE id = ?8",
                params![
                    movie.title,
                    movie.year,
                    movie.status.as_str(),
                    movie.imdb_id,
                    movie.tmdb_id,
                    movie.torrent_hash,
                    now,
                    movie.id,
                ],
            )
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        if changed == 0 {
            return Err(LibraryError::NotFound(movie.id));
        }
        Ok(())
    }

    fn set_status(&self, id: i64, status: MediaStatus) -> Result<(), LibraryError> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        let changed = conn
            .execute(
                "UPDATE movies SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status.as_str(), now, id],
            )
            .map_err(|e| LibraryError::Database(e.to_string()))?;

        if changed == 0 {
            return Err(LibraryError::NotFound(id));
        }
        Ok(())
    }
}

//! Indexer trait and wire-level candidate types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the indexer backend.
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Indexer API error: {0}")]
    ApiError(String),

    #[error("Search timed out")]
    Timeout,
}

/// Parameters for a single movie search request.
#[derive(Debug, Clone, Default)]
pub struct MovieSearchParams {
    /// Free-text query. Ignored by the backend when an external id is set.
    pub query: String,
    pub year: Option<i32>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<i64>,
    /// Torznab category id, e.g. "2000" for Movies.
    pub category: Option<String>,
}

impl MovieSearchParams {
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// True when the request carries an IMDb or TMDB id.
    pub fn has_external_id(&self) -> bool {
        self.imdb_id.as_deref().is_some_and(|s| !s.is_empty())
            || self.tmdb_id.is_some()
    }
}

/// One raw search result as reported by an indexer, before any
/// filtering or scoring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCandidate {
    pub title: String,
    pub size_bytes: u64,
    pub seeders: u32,
    pub peers: u32,
    pub info_hash: Option<String>,
    pub magnet_uri: Option<String>,
    pub download_url: Option<String>,
}

impl RawCandidate {
    /// A magnet URI counts only when present, non-empty, not the
    /// literal string "null", and actually magnet-schemed. Some
    /// indexers report "null" as text for missing fields.
    pub fn usable_magnet(&self) -> Option<&str> {
        self.magnet_uri
            .as_deref()
            .filter(|m| !m.is_empty() && *m != "null" && m.starts_with("magnet:"))
    }

    /// A .torrent download link counts only when present, non-empty
    /// and not the literal string "null".
    pub fn usable_download_url(&self) -> Option<&str> {
        self.download_url
            .as_deref()
            .filter(|u| !u.is_empty() && *u != "null")
    }
}

/// Search backend abstraction.
#[async_trait]
pub trait IndexerClient: Send + Sync {
    /// Run one search request and return every raw result.
    async fn search(&self, params: &MovieSearchParams) -> Result<Vec<RawCandidate>, IndexerError>;
}

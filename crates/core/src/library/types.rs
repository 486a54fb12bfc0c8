//! Movie entity and status types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Acquisition status of a movie in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaStatus {
    /// Added to the library, waiting for a search.
    Wanted,
    /// A torrent search is in progress.
    Searching,
    /// Handed to the download client.
    Downloading,
    /// Download finished.
    Downloaded,
    /// Post-download processing in progress.
    Processing,
    /// Available in the library.
    Ready,
    /// Acquisition failed or was cancelled.
    Failed,
    /// All searches exhausted without a usable candidate.
    NotFound,
}

impl MediaStatus {
    /// String representation as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaStatus::Wanted => "wanted",
            MediaStatus::Searching => "searching",
            MediaStatus::Downloading => "downloading",
            MediaStatus::Downloaded => "downloaded",
            MediaStatus::Processing => "processing",
            MediaStatus::Ready => "ready",
            MediaStatus::Failed => "failed",
            MediaStatus::NotFound => "not_found",
        }
    }

    /// Parse the database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "wanted" => Some(MediaStatus::Wanted),
            "searching" => Some(MediaStatus::Searching),
            "downloading" => Some(MediaStatus::Downloading),
            "downloaded" => Some(MediaStatus::Downloaded),
            "processing" => Some(MediaStatus::Processing),
            "ready" => Some(MediaStatus::Ready),
            "failed" => Some(MediaStatus::Failed),
            "not_found" => Some(MediaStatus::NotFound),
            _ => None,
        }
    }

    /// Whether the periodic sweep should pick this movie up for a search.
    pub fn is_searchable(&self) -> bool {
        matches!(self, MediaStatus::Wanted | MediaStatus::NotFound)
    }
}

impl std::fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movie tracked by the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// Database identity.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Release year, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Current acquisition status.
    pub status: MediaStatus,
    /// IMDB identifier (e.g. "tt0133093").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    /// TMDB identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<i64>,
    /// Info hash of the torrent handed to the download client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub torrent_hash: Option<String>,
    /// When the movie was added.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

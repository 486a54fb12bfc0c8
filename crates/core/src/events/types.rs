//! Event log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::library::MediaStatus;

/// Type of a movie event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieEventType {
    SearchStarted,
    SearchCompleted,
    SearchFailed,
    TorrentFound,
    DownloadStarted,
    DownloadCompleted,
    DownloadFailed,
    JobCancelled,
    StatusChanged,
}

impl MovieEventType {
    /// String representation as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieEventType::SearchStarted => "search_started",
            MovieEventType::SearchCompleted => "search_completed",
            MovieEventType::SearchFailed => "search_failed",
            MovieEventType::TorrentFound => "torrent_found",
            MovieEventType::DownloadStarted => "download_started",
            MovieEventType::DownloadCompleted => "download_completed",
            MovieEventType::DownloadFailed => "download_failed",
            MovieEventType::JobCancelled => "job_cancelled",
            MovieEventType::StatusChanged => "status_changed",
        }
    }

    /// Parse the database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "search_started" => Some(MovieEventType::SearchStarted),
            "search_completed" => Some(MovieEventType::SearchCompleted),
            "search_failed" => Some(MovieEventType::SearchFailed),
            "torrent_found" => Some(MovieEventType::TorrentFound),
            "download_started" => Some(MovieEventType::DownloadStarted),
            "download_completed" => Some(MovieEventType::DownloadCompleted),
            "download_failed" => Some(MovieEventType::DownloadFailed),
            "job_cancelled" => Some(MovieEventType::JobCancelled),
            "status_changed" => Some(MovieEventType::StatusChanged),
            _ => None,
        }
    }
}

/// Structured detail payload attached to an event.
///
/// Closed set of variants so every consumer knows exactly what each
/// event type carries; serialized as tagged JSON in the database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventDetails {
    SearchCompleted {
        torrent_count: usize,
    },
    SearchFailed {
        search_queries: usize,
        total_results_found: usize,
        reason: String,
    },
    SearchError {
        error: String,
    },
    TorrentFound {
        title: String,
        seeders: u32,
        size_gb: f64,
        score: i32,
        quality: String,
    },
    StatusChanged {
        old_status: MediaStatus,
        new_status: MediaStatus,
    },
}

/// One entry in a movie's event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieEvent {
    pub id: i64,
    pub movie_id: i64,
    #[serde(rename = "type")]
    pub event_type: MovieEventType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<EventDetails>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_round_trip() {
        for t in [
            MovieEventType::SearchStarted,
            MovieEventType::SearchCompleted,
            MovieEventType::SearchFailed,
            MovieEventType::TorrentFound,
            MovieEventType::DownloadStarted,
            MovieEventType::DownloadCompleted,
            MovieEventType::DownloadFailed,
            MovieEventType::JobCancelled,
            MovieEventType::StatusChanged,
        ] {
            assert_eq!(MovieEventType::parse(t.as_str()), Some(t));
        }
    }

    #[test]
    fn test_details_tagged_serialization() {
        let details = EventDetails::TorrentFound {
            title: "The Matrix 1999 1080p BluRay x264-SPARKS".to_string(),
            seeders: 850,
            size_gb: 8.2,
            score: 420,
            quality: "1080p".to_string(),
        };

        let json = serde_json::to_string(&details).unwrap();
        assert!(json.contains("\"kind\":\"torrent_found\""));

        let parsed: EventDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, details);
    }

    #[test]
    fn test_status_changed_details() {
        let details = EventDetails::StatusChanged {
            old_status: MediaStatus::Searching,
            new_status: MediaStatus::Downloading,
        };
        let json = serde_json::to_string(&details).unwrap();
        assert!(json.contains("\"old_status\":\"searching\""));
        assert!(json.contains("\"new_status\":\"downloading\""));
    }
}

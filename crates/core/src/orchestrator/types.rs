//! Types for the search orchestrator.

use thiserror::Error;

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Movie store error (including movie-not-found).
    #[error("movie store error: {0}")]
    Library(#[from] crate::library::LibraryError),

    /// Another search for this movie is already in flight.
    #[error("search already in progress for movie {0}")]
    SearchInProgress(i64),

    /// Download client error.
    #[error("download client error: {0}")]
    Download(#[from] crate::downloader::DownloadError),

    /// The selected candidate carries neither a usable magnet URI nor
    /// a download link.
    #[error("no magnet URI or download URL available")]
    NoUsableSource,
}

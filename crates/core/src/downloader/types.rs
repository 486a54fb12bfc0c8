//! Download client trait and errors.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the download client.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Client rejected torrent: {0}")]
    Rejected(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,
}

/// Trait for torrent download backends.
///
/// Both add operations return the info hash of the new torrent when
/// the backend can determine it; an empty string means the hash is not
/// yet known (magnet metadata still resolving).
#[async_trait]
pub trait DownloadClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Add a torrent by magnet URI.
    async fn add_magnet(&self, magnet_uri: &str) -> Result<String, DownloadError>;

    /// Add a torrent by .torrent file URL.
    async fn add_torrent_url(&self, url: &str) -> Result<String, DownloadError>;

    /// Remove a torrent, optionally deleting its files.
    async fn remove(&self, hash: &str, delete_files: bool) -> Result<(), DownloadError>;
}

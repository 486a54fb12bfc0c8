//! Download client integration.
//!
//! Hands selected torrents to an external BitTorrent client. Only the
//! qBittorrent WebUI API is implemented; the trait keeps the
//! orchestrator testable without a running daemon.

mod qbittorrent;
mod types;

pub use qbittorrent::QBittorrentClient;
pub use types::{DownloadClient, DownloadError};

//! Test doubles and fixtures for the core components.
//!
//! Everything here is intended for tests (unit and integration) but
//! compiled into the crate so integration tests and downstream crates
//! can reuse it.

pub mod fixtures;
mod mock_download_client;
mod mock_indexer;

pub use mock_download_client::MockDownloadClient;
pub use mock_indexer::MockIndexer;

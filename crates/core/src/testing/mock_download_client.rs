//! Mock download client for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::downloader::{DownloadClient, DownloadError};

/// Mock implementation of the DownloadClient trait.
///
/// Records added magnets/URLs and returns the info hash embedded in
/// the magnet URI (or a fixed placeholder for URL adds).
#[derive(Clone)]
pub struct MockDownloadClient {
    added_magnets: Arc<Mutex<Vec<String>>>,
    added_urls: Arc<Mutex<Vec<String>>>,
    removed: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockDownloadClient {
    pub fn new() -> Self {
        Self {
            added_magnets: Arc::new(Mutex::new(Vec::new())),
            added_urls: Arc::new(Mutex::new(Vec::new())),
            removed: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// A mock whose every add fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn added_magnets(&self) -> Vec<String> {
        self.added_magnets.lock().unwrap().clone()
    }

    pub fn added_urls(&self) -> Vec<String> {
        self.added_urls.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }
}

impl Default for MockDownloadClient {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_from_magnet(magnet: &str) -> String {
    magnet
        .split("xt=urn:btih:")
        .nth(1)
        .map(|rest| rest.split('&').next().unwrap_or(rest).to_lowercase())
        .unwrap_or_default()
}

#[async_trait]
impl DownloadClient for MockDownloadClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn add_magnet(&self, magnet_uri: &str) -> Result<String, DownloadError> {
        if self.fail {
            return Err(DownloadError::ConnectionFailed(
                "mock client is down".to_string(),
            ));
        }
        self.added_magnets.lock().unwrap().push(magnet_uri.to_string());
        Ok(hash_from_magnet(magnet_uri))
    }

    async fn add_torrent_url(&self, url: &str) -> Result<String, DownloadError> {
        if self.fail {
            return Err(DownloadError::ConnectionFailed(
                "mock client is down".to_string(),
            ));
        }
        self.added_urls.lock().unwrap().push(url.to_string());
        Ok("cafebabe".to_string())
    }

    async fn remove(&self, hash: &str, _delete_files: bool) -> Result<(), DownloadError> {
        self.removed.lock().unwrap().push(hash.to_string());
        Ok(())
    }
}

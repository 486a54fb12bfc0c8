//! qBittorrent download client implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::QBittorrentConfig;

use super::{DownloadClient, DownloadError};

/// Tag attached to every torrent we add, so hash lookups only see our
/// own additions.
const MANAGED_TAG: &str = "cinefetch";

/// qBittorrent WebUI client.
pub struct QBittorrentClient {
    client: Client,
    config: QBittorrentConfig,
    /// Session marker (refreshed on auth failure). The actual cookie
    /// lives in the reqwest cookie jar.
    session: Arc<RwLock<Option<String>>>,
}

impl QBittorrentClient {
    /// Create a new qBittorrent client.
    pub fn new(config: QBittorrentConfig) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .cookie_store(true)
            .build()
            .map_err(|e| DownloadError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config,
            session: Arc::new(RwLock::new(None)),
        })
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    /// Login and mark the session as established.
    async fn login(&self) -> Result<(), DownloadError> {
        let url = format!("{}/api/v2/auth/login", self.base_url());

        let params = [
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DownloadError::Timeout
                } else if e.is_connect() {
                    DownloadError::ConnectionFailed(e.to_string())
                } else {
                    DownloadError::ApiError(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if body.contains("Ok.") {
            debug!("qBittorrent login successful");
            let mut session = self.session.write().await;
            *session = Some("authenticated".to_string());
            Ok(())
        } else if body.contains("Fails.") || status.as_u16() == 403 {
            Err(DownloadError::AuthenticationFailed(
                "Invalid credentials".to_string(),
            ))
        } else {
            Err(DownloadError::AuthenticationFailed(format!(
                "Unexpected response: {}",
                body.chars().take(100).collect::<String>()
            )))
        }
    }

    async fn ensure_authenticated(&self) -> Result<(), DownloadError> {
        let session = self.session.read().await;
        if session.is_some() {
            return Ok(());
        }
        drop(session);
        self.login().await
    }

    /// Make an authenticated GET request.
    async fn get(&self, endpoint: &str) -> Result<String, DownloadError> {
        self.ensure_authenticated().await?;

        let url = format!("{}{}", self.base_url(), endpoint);
        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::Timeout
            } else {
                DownloadError::ApiError(e.to_string())
            }
        })?;

        let status = response.status();
        if status.as_u16() == 403 {
            // Session expired, retry after login
            warn!("qBittorrent session expired, re-authenticating");
            {
                let mut session = self.session.write().await;
                *session = None;
            }
            self.login().await?;

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| DownloadError::ApiError(e.to_string()))?;

            if !response.status().is_success() {
                return Err(DownloadError::ApiError(format!(
                    "HTTP {}",
                    response.status()
                )));
            }

            return response
                .text()
                .await
                .map_err(|e| DownloadError::ApiError(e.to_string()));
        }

        if !status.is_success() {
            return Err(DownloadError::ApiError(format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| DownloadError::ApiError(e.to_string()))
    }

    /// Make an authenticated POST request with form data.
    async fn post_form(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, DownloadError> {
        self.ensure_authenticated().await?;

        let url = format!("{}{}", self.base_url(), endpoint);
        let response = self
            .client
            .post(&url)
            .form(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DownloadError::Timeout
                } else {
                    DownloadError::ApiError(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 403 {
            // Session expired, retry after login
            warn!("qBittorrent session expired, re-authenticating");
            {
                let mut session = self.session.write().await;
                *session = None;
            }
            self.login().await?;

            let response = self
                .client
                .post(&url)
                .form(params)
                .send()
                .await
                .map_err(|e| DownloadError::ApiError(e.to_string()))?;

            if !response.status().is_success() {
                return Err(DownloadError::ApiError(format!(
                    "HTTP {}",
                    response.status()
                )));
            }

            return response
                .text()
                .await
                .map_err(|e| DownloadError::ApiError(e.to_string()));
        }

        if !status.is_success() {
            return Err(DownloadError::ApiError(format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| DownloadError::ApiError(e.to_string()))
    }

    /// Submit a source (magnet URI or .torrent URL) via torrents/add.
    async fn add_source(&self, source: &str) -> Result<(), DownloadError> {
        let mut params = vec![("urls", source), ("tags", MANAGED_TAG)];

        if let Some(path) = &self.config.download_path {
            params.push(("savepath", path.as_str()));
        }
        if let Some(cat) = &self.config.category {
            params.push(("category", cat.as_str()));
        }

        let body = self.post_form("/api/v2/torrents/add", &params).await?;

        // qBittorrent answers "Ok." on success and "Fails." when it
        // cannot parse the source.
        if body.contains("Fails.") {
            return Err(DownloadError::Rejected(source.to_string()));
        }
        Ok(())
    }

    /// Look up the hash of the newest torrent carrying our tag. Used
    /// when the source was a .torrent URL and the hash is unknown.
    async fn newest_managed_hash(&self) -> Result<Option<String>, DownloadError> {
        let endpoint = format!(
            "/api/v2/torrents/info?tag={}&sort=added_on&reverse=true&limit=1",
            urlencoding::encode(MANAGED_TAG)
        );
        let response = self.get(&endpoint).await?;

        let torrents: Vec<QBTorrentInfo> = serde_json::from_str(&response)
            .map_err(|e| DownloadError::ApiError(format!("Failed to parse response: {}", e)))?;

        Ok(torrents.into_iter().next().map(|t| t.hash.to_lowercase()))
    }
}

#[derive(Debug, Deserialize)]
struct QBTorrentInfo {
    hash: String,
}

#[async_trait]
impl DownloadClient for QBittorrentClient {
    fn name(&self) -> &str {
        "qbittorrent"
    }

    async fn add_magnet(&self, magnet_uri: &str) -> Result<String, DownloadError> {
        self.add_source(magnet_uri).await?;
        Ok(extract_hash_from_magnet(magnet_uri).unwrap_or_default())
    }

    async fn add_torrent_url(&self, url: &str) -> Result<String, DownloadError> {
        self.add_source(url).await?;
        // The hash is only known after the client fetched the file.
        Ok(self.newest_managed_hash().await?.unwrap_or_default())
    }

    async fn remove(&self, hash: &str, delete_files: bool) -> Result<(), DownloadError> {
        let hash_lower = hash.to_lowercase();
        let delete_str = if delete_files { "true" } else { "false" };

        self.post_form(
            "/api/v2/torrents/delete",
            &[("hashes", &hash_lower), ("deleteFiles", delete_str)],
        )
        .await?;

        Ok(())
    }
}

/// Extract info hash from a magnet URI.
pub(crate) fn extract_hash_from_magnet(magnet: &str) -> Option<String> {
    // Look for xt=urn:btih:HASH
    let parts: Vec<&str> = magnet.split('?').collect();
    if parts.len() < 2 {
        return None;
    }

    for param in parts[1].split('&') {
        if let Some(value) = param.strip_prefix("xt=urn:btih:") {
            // Handle both hex and base32 hashes
            let hash = value.split('&').next().unwrap_or(value);
            return Some(hash.to_lowercase());
        }
    }
    None
}

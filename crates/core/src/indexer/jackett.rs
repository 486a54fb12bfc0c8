//! Jackett search backend implementation.
//!
//! Talks to the aggregate endpoint (`indexers/all/results`) with the
//! Torznab `t=movie` function, so a single request fans out to every
//! indexer configured in Jackett.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::JackettConfig;

use super::{IndexerClient, IndexerError, MovieSearchParams, RawCandidate};

/// Jackett search backend.
pub struct JackettClient {
    client: Client,
    config: JackettConfig,
}

impl JackettClient {
    /// Create a new client with the given configuration.
    pub fn new(config: JackettConfig) -> Result<Self, IndexerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| IndexerError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Build the aggregate search URL for a request.
    fn build_search_url(&self, params: &MovieSearchParams) -> String {
        let mut url = format!(
            "{}/api/v2.0/indexers/all/results?apikey={}&t=movie",
            self.config.url.trim_end_matches('/'),
            urlencoding::encode(&self.config.api_key),
        );

        if params.has_external_id() {
            // Id lookups are exact; text and year would only narrow a
            // result set that is already keyed to one film.
            if let Some(imdb) = params.imdb_id.as_deref().filter(|s| !s.is_empty()) {
                url.push_str(&format!("&imdbid={}", urlencoding::encode(imdb)));
            }
            if let Some(tmdb) = params.tmdb_id {
                url.push_str(&format!("&tmdbid={}", tmdb));
            }
        } else {
            url.push_str(&format!("&q={}", urlencoding::encode(&params.query)));
            if let Some(year) = params.year {
                url.push_str(&format!("&year={}", year));
            }
        }

        if let Some(cat) = &params.category {
            url.push_str(&format!("&cat={}", urlencoding::encode(cat)));
        }

        url
    }
}

#[async_trait]
impl IndexerClient for JackettClient {
    async fn search(&self, params: &MovieSearchParams) -> Result<Vec<RawCandidate>, IndexerError> {
        let url = self.build_search_url(params);
        debug!(query = %params.query, category = ?params.category, "Searching Jackett");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                IndexerError::Timeout
            } else if e.is_connect() {
                IndexerError::ConnectionFailed(e.to_string())
            } else {
                IndexerError::ApiError(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IndexerError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let jackett_response: JackettResponse = response
            .json()
            .await
            .map_err(|e| IndexerError::ApiError(format!("Failed to parse response: {}", e)))?;

        debug!(
            results = jackett_response.Results.len(),
            "Jackett search complete"
        );

        Ok(jackett_response
            .Results
            .into_iter()
            .map(|r| RawCandidate {
                title: r.Title,
                size_bytes: r.Size.unwrap_or(0).max(0) as u64,
                seeders: r.Seeders.unwrap_or(0).max(0) as u32,
                peers: r.Peers.unwrap_or(0).max(0) as u32,
                info_hash: r.InfoHash.map(|h| h.to_lowercase()),
                magnet_uri: r.MagnetUri,
                download_url: r.Link,
            })
            .collect())
    }
}

// Jackett API response types
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResponse {
    Results: Vec<JackettResult>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResult {
    Title: String,
    MagnetUri: Option<String>,
    Link: Option<String>,
    InfoHash: Option<String>,
    Size: Option<i64>,
    Seeders: Option<i32>,
    Peers: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> JackettClient {
        JackettClient::new(JackettConfig {
            url: "http://localhost:9117/".to_string(), // trailing slash
            api_key: "test-key".to_string(),
            timeout_secs: 30,
        })
        .unwrap()
    }

    #[test]
    fn test_build_search_url_text() {
        let params = MovieSearchParams {
            query: "The Matrix 1999".to_string(),
            year: Some(1999),
            category: Some("2000".to_string()),
            ..Default::default()
        };

        let url = client().build_search_url(&params);
        assert!(url.starts_with("http://localhost:9117/api/v2.0/indexers/all/results"));
        assert!(url.contains("apikey=test-key"));
        assert!(url.contains("t=movie"));
        assert!(url.contains("q=The%20Matrix%201999"));
        assert!(url.contains("year=1999"));
        assert!(url.contains("cat=2000"));
    }

    #[test]
    fn test_build_search_url_imdb_id_skips_text() {
        let params = MovieSearchParams {
            query: "The Matrix 1999".to_string(),
            year: Some(1999),
            imdb_id: Some("tt0133093".to_string()),
            ..Default::default()
        };

        let url = client().build_search_url(&params);
        assert!(url.contains("imdbid=tt0133093"));
        assert!(!url.contains("q="));
        assert!(!url.contains("year="));
    }

    #[test]
    fn test_build_search_url_tmdb_id() {
        let params = MovieSearchParams {
            query: "The Matrix".to_string(),
            tmdb_id: Some(603),
            category: Some("2010".to_string()),
            ..Default::default()
        };

        let url = client().build_search_url(&params);
        assert!(url.contains("tmdbid=603"));
        assert!(url.contains("cat=2010"));
        assert!(!url.contains("q="));
    }
}

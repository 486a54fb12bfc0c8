//! Candidate types produced by the selection pipeline.

use serde::{Deserialize, Serialize};

use crate::indexer::RawCandidate;

/// Video quality label extracted from a release title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    FourK,
    P1080,
    P720,
    P480,
    Unknown,
}

impl Quality {
    /// Extract the quality label from a release title.
    pub fn extract(title: &str) -> Self {
        let title = title.to_uppercase();
        if title.contains("2160P") || title.contains("4K") {
            Quality::FourK
        } else if title.contains("1080P") {
            Quality::P1080
        } else if title.contains("720P") {
            Quality::P720
        } else if title.contains("480P") {
            Quality::P480
        } else {
            Quality::Unknown
        }
    }

    /// Human-readable label used in events and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::FourK => "4K",
            Quality::P1080 => "1080p",
            Quality::P720 => "720p",
            Quality::P480 => "480p",
            Quality::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate that survived filtering, with its score attached.
///
/// Lives only for the duration of one selection pass; the chosen
/// winner is recorded in the event log, nothing else is persisted.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub title: String,
    pub size_bytes: u64,
    pub seeders: u32,
    pub peers: u32,
    pub info_hash: Option<String>,
    pub magnet_uri: Option<String>,
    pub download_url: Option<String>,
    pub quality: Quality,
    pub score: i32,
}

impl ScoredCandidate {
    pub fn new(raw: RawCandidate, quality: Quality, score: i32) -> Self {
        Self {
            title: raw.title,
            size_bytes: raw.size_bytes,
            seeders: raw.seeders,
            peers: raw.peers,
            info_hash: raw.info_hash,
            magnet_uri: raw.magnet_uri,
            download_url: raw.download_url,
            quality,
            score,
        }
    }

    /// Size in GiB, for events and logs.
    pub fn size_gb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0 * 1024.0)
    }

    /// See [`RawCandidate::usable_magnet`].
    pub fn usable_magnet(&self) -> Option<&str> {
        self.magnet_uri
            .as_deref()
            .filter(|m| !m.is_empty() && *m != "null" && m.starts_with("magnet:"))
    }

    /// See [`RawCandidate::usable_download_url`].
    pub fn usable_download_url(&self) -> Option<&str> {
        self.download_url
            .as_deref()
            .filter(|u| !u.is_empty() && *u != "null")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_extract() {
        assert_eq!(Quality::extract("Movie 2160p HDR"), Quality::FourK);
        assert_eq!(Quality::extract("Movie 4k remux"), Quality::FourK);
        assert_eq!(Quality::extract("Movie 1080p BluRay"), Quality::P1080);
        assert_eq!(Quality::extract("Movie 720p WEB"), Quality::P720);
        assert_eq!(Quality::extract("Movie 480p DVDRip"), Quality::P480);
        assert_eq!(Quality::extract("Movie BluRay"), Quality::Unknown);
    }

    #[test]
    fn test_quality_extract_prefers_higher_resolution() {
        // 2160p listed alongside a 1080p encode note still reads as 4K.
        assert_eq!(
            Quality::extract("Movie 2160p (upscaled from 1080p)"),
            Quality::FourK
        );
    }

    #[test]
    fn test_quality_as_str() {
        assert_eq!(Quality::FourK.as_str(), "4K");
        assert_eq!(Quality::P1080.as_str(), "1080p");
        assert_eq!(Quality::Unknown.as_str(), "Unknown");
    }

    #[test]
    fn test_size_gb() {
        let c = ScoredCandidate::new(
            RawCandidate {
                size_bytes: 2 * 1024 * 1024 * 1024,
                ..Default::default()
            },
            Quality::Unknown,
            0,
        );
        assert!((c.size_gb() - 2.0).abs() < 1e-9);
    }
}

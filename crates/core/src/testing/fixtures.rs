//! Canned data for tests.

use crate::indexer::RawCandidate;

/// A healthy, well-seeded 1080p release that passes every filter.
pub fn release(title: &str, info_hash: &str) -> RawCandidate {
    RawCandidate {
        title: title.to_string(),
        size_bytes: 8 * 1024 * 1024 * 1024,
        seeders: 200,
        peers: 50,
        info_hash: Some(info_hash.to_string()),
        magnet_uri: Some(format!(
            "magnet:?xt=urn:btih:{}&tr=udp://tracker.example/announce&dn={}",
            info_hash,
            title.replace(' ', ".")
        )),
        download_url: None,
    }
}

/// A release with a .torrent URL but no magnet.
pub fn url_only_release(title: &str, url: &str) -> RawCandidate {
    RawCandidate {
        title: title.to_string(),
        size_bytes: 8 * 1024 * 1024 * 1024,
        seeders: 80,
        peers: 20,
        download_url: Some(url.to_string()),
        ..Default::default()
    }
}

/// A release that the hard filter rejects (zero seeders).
pub fn dead_release(title: &str) -> RawCandidate {
    RawCandidate {
        title: title.to_string(),
        size_bytes: 8 * 1024 * 1024 * 1024,
        seeders: 0,
        peers: 0,
        magnet_uri: Some("magnet:?xt=urn:btih:0000".to_string()),
        ..Default::default()
    }
}

//! Torrent candidate selection engine.
//!
//! Pure functions from raw indexer results to a ranked best-first
//! candidate list. No I/O lives here; a pass that filters out every
//! result yields an empty list, never an error.
//!
//! Pipeline: [`build_search_queries`] produces the query strings the
//! orchestrator sends upstream; [`process_results`] filters and scores
//! raw results for one movie; [`select_best`] deduplicates, ranks and
//! truncates the merged pool.

mod filter;
mod query;
mod rank;
mod score;
mod types;

pub use filter::{rejection, RejectReason};
pub use query::build_search_queries;
pub use rank::select_best;
pub use score::score_candidate;
pub use types::{Quality, ScoredCandidate};

use crate::indexer::RawCandidate;

use std::collections::HashMap;

use tracing::debug;

/// Filter and score one batch of raw results against a movie.
///
/// Rejected results are counted per reason for the caller's logging;
/// survivors carry their extracted quality label and final score.
pub fn process_results(
    results: Vec<RawCandidate>,
    movie_title: &str,
    movie_year: Option<i32>,
) -> Vec<ScoredCandidate> {
    let total = results.len();
    let mut rejected: HashMap<RejectReason, usize> = HashMap::new();
    let mut kept = Vec::new();

    for raw in results {
        if let Some(reason) = rejection(&raw, movie_title) {
            *rejected.entry(reason).or_insert(0) += 1;
            continue;
        }

        let quality = Quality::extract(&raw.title);
        let score = score_candidate(&raw, movie_title, movie_year);
        kept.push(ScoredCandidate::new(raw, quality, score));
    }

    debug!(
        total = total,
        kept = kept.len(),
        rejected = ?rejected,
        movie = movie_title,
        "Filtered search results"
    );

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy(title: &str) -> RawCandidate {
        RawCandidate {
            title: title.to_string(),
            size_bytes: 8 * 1024 * 1024 * 1024,
            seeders: 120,
            peers: 40,
            magnet_uri: Some("magnet:?xt=urn:btih:abc&tr=udp://x&dn=y".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_process_results_keeps_good_drops_bad() {
        let results = vec![
            healthy("The Matrix 1999 1080p BluRay x264-SPARKS"),
            RawCandidate {
                seeders: 0,
                ..healthy("The Matrix 1999 720p WEB-DL")
            },
            healthy("Unrelated Film 2020 1080p"),
        ];

        let kept = process_results(results, "The Matrix", Some(1999));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].quality, Quality::P1080);
        assert!(kept[0].score > 0);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let raw = healthy("The Matrix 1999 1080p BluRay x264-SPARKS");
        let a = score_candidate(&raw, "The Matrix", Some(1999));
        let b = score_candidate(&raw, "The Matrix", Some(1999));
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(process_results(Vec::new(), "Jaws", Some(1975)).is_empty());
    }
}

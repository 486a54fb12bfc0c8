//! Deduplication and ranking of scored candidates.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::ScoredCandidate;

/// How many ranked candidates to keep.
const MAX_RESULTS: usize = 10;

/// Deduplicate, rank best-first and truncate the merged candidate
/// pool.
///
/// Dedup key is the info hash when present, otherwise the lowercased
/// trimmed title; the first occurrence wins. Ranking is score
/// descending, then magnet availability, then seeder count.
pub fn select_best(candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    if candidates.is_empty() {
        return candidates;
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut unique: Vec<ScoredCandidate> = Vec::new();

    for candidate in candidates {
        let key = match candidate.info_hash.as_deref().filter(|h| !h.is_empty()) {
            Some(hash) => hash.to_string(),
            None => candidate.title.trim().to_lowercase(),
        };
        if seen.insert(key) {
            unique.push(candidate);
        }
    }

    unique.sort_by(|a, b| match b.score.cmp(&a.score) {
        Ordering::Equal => {
            let a_magnet = a.usable_magnet().is_some();
            let b_magnet = b.usable_magnet().is_some();
            match b_magnet.cmp(&a_magnet) {
                Ordering::Equal => b.seeders.cmp(&a.seeders),
                other => other,
            }
        }
        other => other,
    });

    unique.truncate(MAX_RESULTS);
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::RawCandidate;
    use crate::selection::Quality;

    fn candidate(title: &str, score: i32) -> ScoredCandidate {
        ScoredCandidate::new(
            RawCandidate {
                title: title.to_string(),
                seeders: 10,
                ..Default::default()
            },
            Quality::Unknown,
            score,
        )
    }

    #[test]
    fn test_sorted_by_score_descending() {
        let ranked = select_best(vec![
            candidate("low", 10),
            candidate("high", 300),
            candidate("mid", 100),
        ]);
        let titles: Vec<_> = ranked.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_dedup_by_info_hash() {
        let mut a = candidate("Release A", 100);
        a.info_hash = Some("deadbeef".to_string());
        let mut b = candidate("Release B", 90);
        b.info_hash = Some("deadbeef".to_string());

        let ranked = select_best(vec![a, b]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].title, "Release A"); // first occurrence wins
    }

    #[test]
    fn test_dedup_by_normalized_title_when_no_hash() {
        let ranked = select_best(vec![
            candidate("  The Matrix 1999 ", 100),
            candidate("the matrix 1999", 90),
        ]);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_magnet_tiebreak() {
        let without = candidate("no magnet", 100);
        let mut with = candidate("has magnet", 100);
        with.magnet_uri = Some("magnet:?xt=urn:btih:abc".to_string());

        let ranked = select_best(vec![without, with]);
        assert_eq!(ranked[0].title, "has magnet");
    }

    #[test]
    fn test_seeder_tiebreak() {
        let mut few = candidate("few seeders", 100);
        few.seeders = 5;
        let mut many = candidate("many seeders", 100);
        many.seeders = 500;

        let ranked = select_best(vec![few, many]);
        assert_eq!(ranked[0].title, "many seeders");
    }

    #[test]
    fn test_truncated_to_ten() {
        let candidates: Vec<_> = (0..25)
            .map(|i| candidate(&format!("release {}", i), i))
            .collect();
        let ranked = select_best(candidates);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].score, 24);
    }
}

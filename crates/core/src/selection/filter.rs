//! Hard filters applied before scoring.

use crate::indexer::RawCandidate;

/// Release markers that disqualify a result outright.
pub(crate) const LOW_QUALITY_MARKERS: &[&str] = &[
    "CAM", "TS", "TELESYNC", "HDCAM", "HDTS", "TC", "TELECINE", "WORKPRINT", "WP", "SCREENER",
    "SCR", "DVDSCR", "BDSCR", "KORSUB", "HC", "HARDCODED", "HARDSUB", "R5", "R6",
];

/// Words ignored when judging title relevance.
pub(crate) const STOPWORDS: &[&str] = &[
    "THE", "A", "AN", "OF", "AND", "OR", "BUT", "IN", "ON", "AT", "TO", "FOR", "AS", "BY",
];

const MIN_SIZE_BYTES: u64 = 100 * 1024 * 1024;
const MAX_SIZE_BYTES: u64 = 100 * 1024 * 1024 * 1024;

/// Why a raw result was discarded before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    NoSeeders,
    LowQuality,
    NoDownloadMethod,
    TooSmall,
    TooLarge,
    NotRelevant,
}

/// Check a raw result against every hard filter. Returns the first
/// failing reason, or `None` when the result should be scored.
pub fn rejection(candidate: &RawCandidate, movie_title: &str) -> Option<RejectReason> {
    if candidate.seeders == 0 {
        return Some(RejectReason::NoSeeders);
    }

    let title = candidate.title.to_uppercase();
    if is_low_quality_release(&title) {
        return Some(RejectReason::LowQuality);
    }

    if candidate.usable_magnet().is_none() && candidate.usable_download_url().is_none() {
        return Some(RejectReason::NoDownloadMethod);
    }

    if candidate.size_bytes < MIN_SIZE_BYTES {
        return Some(RejectReason::TooSmall);
    }
    if candidate.size_bytes > MAX_SIZE_BYTES {
        return Some(RejectReason::TooLarge);
    }

    if !is_relevant_title(&title, movie_title) {
        return Some(RejectReason::NotRelevant);
    }

    None
}

/// True when the (uppercased) title carries any low-quality marker.
pub(crate) fn is_low_quality_release(title_upper: &str) -> bool {
    LOW_QUALITY_MARKERS.iter().any(|m| title_upper.contains(m))
}

/// Significant words of a movie title: non-stopword, length > 2,
/// uppercased.
pub(crate) fn significant_words(movie_title: &str) -> Vec<String> {
    movie_title
        .to_uppercase()
        .split_whitespace()
        .filter(|w| !STOPWORDS.contains(w) && w.len() > 2)
        .map(|w| w.to_string())
        .collect()
}

/// Relevance check: enough of the movie's significant words must
/// appear in the candidate title.
///
/// Short titles (at most 2 significant words) need a single match;
/// longer ones need at least 30% of them (floored, minimum 1). A
/// title with no significant words at all falls back to matching any
/// word longer than 2 characters.
pub(crate) fn is_relevant_title(torrent_title_upper: &str, movie_title: &str) -> bool {
    let significant = significant_words(movie_title);

    if significant.is_empty() {
        return movie_title
            .to_uppercase()
            .split_whitespace()
            .any(|w| w.len() > 2 && torrent_title_upper.contains(w));
    }

    let matched = significant
        .iter()
        .filter(|w| torrent_title_upper.contains(w.as_str()))
        .count();

    if significant.len() <= 2 {
        matched >= 1
    } else {
        matched >= std::cmp::max(1, significant.len() * 3 / 10)
    }
}

//! Candidate scoring heuristics.
//!
//! Every contribution is independent and additive; the final total is
//! floored at zero. The weights encode release-quality judgment, e.g.
//! 1080p outranks 4K because of the size/quality tradeoff.

use crate::indexer::RawCandidate;

use super::filter::STOPWORDS;

/// Release groups that earn a trust bonus.
const TRUSTED_GROUPS: &[&str] = &[
    "SPARKS",
    "FGT",
    "CMRG",
    "EVO",
    "RARBG",
    "YTS",
    "YIFY",
    "PSA",
    "ION10",
    "AMZN",
    "NTG",
    "FLUX",
    "TOMMY",
    "DEFLATE",
    "QOQ",
    "TEHPARADOX",
    "GECKOS",
    "ROVERS",
    "DRONES",
    "STUTTERSHIT",
    "KINGDOM",
    "MZABI",
    "TAYTO",
    "W4F",
    "LAZY",
    "ZQ",
    "KRALIMARKO",
    "PBK",
    "TAOE",
    "UTR",
    "MTEAM",
    "CHD",
    "WIKI",
    "TDD",
    "TIGOLE",
    "JOY",
    "PAHE",
    "QXR",
    "HQMUX",
    "D3G",
    "PLAYBD",
    "HDH",
    "IFI",
];

/// Score one raw result against a movie. Pure function of its inputs.
pub fn score_candidate(result: &RawCandidate, movie_title: &str, movie_year: Option<i32>) -> i32 {
    let title = result.title.to_uppercase();
    let movie_title_upper = movie_title.to_uppercase();

    let mut score = title_match_score(&title, &movie_title_upper);

    if let Some(year) = movie_year {
        if title.contains(&year.to_string()) {
            score += 40;
        }
    }

    score += seeders_peers_score(result.seeders, result.peers);
    score += release_type_score(&title);
    score += resolution_score(&title);
    score += encoding_score(&title);
    score += audio_score(&title);
    score += trusted_group_score(&title);
    score += source_availability_score(result);
    score += size_fit_score(result.size_bytes, &title);
    score += quality_penalties(&title);

    if title.contains("DUBBED")
        || title.contains("FRENCH")
        || title.contains("GERMAN")
        || title.contains("SPANISH")
        || title.contains("ITALIAN")
    {
        score -= 20;
    }

    score.max(0)
}

/// Word-level and phrase-level title matching.
fn title_match_score(title: &str, movie_title: &str) -> i32 {
    let mut score = 0;
    let mut significant_matches = 0;

    // Only words longer than 2 characters participate; stopwords that
    // long still earn a small bonus.
    for word in movie_title.split_whitespace() {
        if word.len() > 2 && title.contains(word) {
            if STOPWORDS.contains(&word) {
                score += 5;
            } else {
                score += 15;
                significant_matches += 1;
            }
        }
    }

    if significant_matches >= 2 {
        score += 20;
    }

    if title.contains(movie_title) {
        score += 40;
    }

    // Variant with colons removed and hyphens spaced out.
    let clean = movie_title
        .replace(':', "")
        .replace('-', " ")
        .replace("  ", " ");
    if title.contains(&clean) {
        score += 25;
    }

    score
}

/// Tiered swarm-health scoring.
fn seeders_peers_score(seeders: u32, peers: u32) -> i32 {
    let mut score = match seeders {
        1000.. => 100,
        500.. => 80,
        200.. => 60,
        100.. => 50,
        50.. => 40,
        25.. => 30,
        15.. => 25,
        10.. => 20,
        5.. => 15,
        3.. => 10,
        1.. => 5,
        // Unreachable behind the zero-seeder filter, kept for callers
        // that score unfiltered input.
        0 => -50,
    };

    score += match peers {
        100.. => 20,
        50.. => 15,
        20.. => 12,
        10.. => 10,
        5.. => 8,
        2.. => 5,
        _ => 0,
    };

    if seeders > 0 && peers > 0 {
        let ratio = seeders as f64 / peers as f64;
        if ratio >= 2.0 {
            score += 15;
        } else if ratio >= 1.0 {
            score += 10;
        } else if ratio >= 0.5 {
            score += 5;
        }
    }

    score
}

/// Release-type hierarchy; first match wins.
fn release_type_score(title: &str) -> i32 {
    if title.contains("REMUX") {
        100
    } else if title.contains("BLURAY")
        || title.contains("BDR")
        || title.contains("BD25")
        || title.contains("BD50")
    {
        80
    } else if title.contains("WEB-DL") || title.contains("WEBDL") {
        70
    } else if title.contains("WEBRIP") || title.contains("WEB RIP") {
        60
    } else if title.contains("BRRIP") || title.contains("BLURAY RIP") {
        55
    } else if title.contains("DVDRIP") || title.contains("DVD RIP") {
        45
    } else if title.contains("HDTV") || title.contains("PDTV") {
        40
    } else if title.contains("DVDSCR") || title.contains("SCREENER") {
        30
    } else {
        0
    }
}

/// Resolution preference. 1080p deliberately outranks 4K.
fn resolution_score(title: &str) -> i32 {
    if title.contains("2160P") || title.contains("4K") || title.contains("UHD") {
        35
    } else if title.contains("1080P") {
        40
    } else if title.contains("720P") {
        30
    } else if title.contains("480P") || title.contains("SD") {
        10
    } else {
        0
    }
}

fn encoding_score(title: &str) -> i32 {
    if title.contains("X265") || title.contains("HEVC") || title.contains("H265") {
        15
    } else if title.contains("X264") || title.contains("H264") {
        10
    } else {
        0
    }
}

fn audio_score(title: &str) -> i32 {
    if title.contains("ATMOS") || title.contains("TRUEHD") {
        20
    } else if title.contains("DTS-HD") || title.contains("DTSHD") {
        15
    } else if title.contains("DTS") || title.contains("DD5.1") || title.contains("AC3") {
        10
    } else if title.contains("AAC") {
        5
    } else {
        0
    }
}

/// Trust bonus for known release groups; first match wins.
fn trusted_group_score(title_upper: &str) -> i32 {
    for group in TRUSTED_GROUPS {
        if title_upper.contains(group) {
            return match *group {
                "SPARKS" | "FGT" | "RARBG" | "PSA" | "NTG" => 25,
                "EVO" | "CMRG" | "ION10" | "QOQ" => 20,
                _ => 15,
            };
        }
    }
    0
}

/// Magnet and download-link availability.
fn source_availability_score(result: &RawCandidate) -> i32 {
    let mut score = 0;

    match result.usable_magnet() {
        Some(magnet) => {
            score += 50;
            if magnet.contains("tr=") {
                score += 10;
            }
            if magnet.contains("dn=") {
                score += 5;
            }
        }
        None => score -= 30,
    }

    if result.usable_download_url().is_some() {
        score += 10;
    }

    score
}

/// Expected size range per resolution, with penalties for extremes.
fn size_fit_score(size_bytes: u64, title: &str) -> i32 {
    let size_gb = size_bytes as f64 / (1024.0 * 1024.0 * 1024.0);

    if title.contains("2160P") || title.contains("4K") {
        if (15.0..=80.0).contains(&size_gb) {
            return 15;
        } else if size_gb > 5.0 && size_gb < 15.0 {
            return 10;
        }
    } else if title.contains("1080P") {
        if (3.0..=25.0).contains(&size_gb) {
            return 15;
        } else if (1.5..3.0).contains(&size_gb) {
            return 10;
        }
    } else if title.contains("720P") {
        if (1.0..=8.0).contains(&size_gb) {
            return 15;
        } else if (0.7..1.0).contains(&size_gb) {
            return 10;
        }
    }

    if size_gb < 0.5 || size_gb > 100.0 {
        return -20;
    }

    5
}

/// Penalties for releases that slipped past the hard filter.
fn quality_penalties(title: &str) -> i32 {
    let mut penalty = 0;

    if title.contains("CAM")
        || title.contains("TS")
        || title.contains("HDCAM")
        || title.contains("TELESYNC")
        || title.contains("HDTS")
        || title.contains("TC")
    {
        penalty -= 100;
    }

    if title.contains("WORKPRINT")
        || title.contains("WP")
        || title.contains("UNFINISHED")
        || title.contains("LEAK")
    {
        penalty -= 50;
    }

    if title.contains("KORSUB") || title.contains("HC") || title.contains("HARDCODED") {
        penalty -= 30;
    }

    penalty
}

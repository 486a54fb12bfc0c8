//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Search orchestration (searches, candidates, downloads)
//! - Job scheduling (sweeps)
//! - External services (Jackett, qBittorrent)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Search Metrics
// =============================================================================

/// Movie searches total by outcome.
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cinefetch_searches_total", "Total movie searches"),
        &["outcome"], // "found", "not_found", "error"
    )
    .unwrap()
});

/// Queries issued per movie search.
pub static QUERIES_PER_SEARCH: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cinefetch_queries_per_search",
            "Number of indexer queries issued per movie search",
        )
        .buckets(vec![1.0, 2.0, 3.0, 5.0, 10.0]),
        &[],
    )
    .unwrap()
});

/// Raw results seen per movie search, before filtering.
pub static RAW_RESULTS_SEEN: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cinefetch_raw_results_seen",
            "Raw indexer results per movie search before filtering",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]),
        &[],
    )
    .unwrap()
});

/// Candidates surviving filtering and ranking per search.
pub static CANDIDATES_RANKED: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cinefetch_candidates_ranked",
            "Ranked candidates per movie search after filtering",
        )
        .buckets(vec![0.0, 1.0, 2.0, 3.0, 5.0, 10.0]),
        &[],
    )
    .unwrap()
});

/// Winning candidate scores.
pub static BEST_SCORE: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cinefetch_best_score",
            "Distribution of winning candidate scores",
        )
        .buckets(vec![0.0, 50.0, 100.0, 200.0, 300.0, 400.0, 500.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Download Metrics
// =============================================================================

/// Downloads handed to the download client.
pub static DOWNLOADS_STARTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("cinefetch_downloads_started_total", "Total downloads started").unwrap()
});

/// Downloads the client rejected or that failed to submit.
pub static DOWNLOADS_FAILED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "cinefetch_downloads_failed_total",
        "Total downloads that failed to start",
    )
    .unwrap()
});

// =============================================================================
// Scheduler Metrics
// =============================================================================

/// Library sweeps completed.
pub static SWEEPS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("cinefetch_sweeps_total", "Total library sweeps completed").unwrap()
});

/// Sweep duration in seconds.
pub static SWEEP_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("cinefetch_sweep_duration_seconds", "Duration of library sweeps")
            .buckets(vec![0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 300.0, 600.0]),
        &[],
    )
    .unwrap()
});

/// Events removed by the retention purge.
pub static EVENTS_PURGED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "cinefetch_events_purged_total",
        "Total events removed by retention sweeps",
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cinefetch_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "status"], // status: "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Search
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(QUERIES_PER_SEARCH.clone()),
        Box::new(RAW_RESULTS_SEEN.clone()),
        Box::new(CANDIDATES_RANKED.clone()),
        Box::new(BEST_SCORE.clone()),
        // Downloads
        Box::new(DOWNLOADS_STARTED.clone()),
        Box::new(DOWNLOADS_FAILED.clone()),
        // Scheduler
        Box::new(SWEEPS_TOTAL.clone()),
        Box::new(SWEEP_DURATION.clone()),
        Box::new(EVENTS_PURGED.clone()),
        // External services
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
    ]
}

//! Search orchestrator implementation.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::downloader::DownloadClient;
use crate::events::{EventDetails, EventStore, MovieEventType};
use crate::indexer::{IndexerClient, MovieSearchParams, RawCandidate};
use crate::library::{MediaStatus, Movie, MovieStore};
use crate::metrics;
use crate::selection::{build_search_queries, process_results, select_best, ScoredCandidate};

use super::types::OrchestratorError;

/// Torznab movie category codes, tried in order until one yields
/// results.
const MOVIE_CATEGORIES: &[&str] = &["2000", "2010", "2020", "2030", "2040", "2050", "2060"];

/// Generic category used for the last-resort search.
const GENERIC_CATEGORY: &str = "2000";

/// Drives the search-and-acquire workflow for movies.
pub struct SearchOrchestrator {
    movies: Arc<dyn MovieStore>,
    events: Arc<dyn EventStore>,
    indexer: Arc<dyn IndexerClient>,
    downloader: Option<Arc<dyn DownloadClient>>,
    /// Pause between per-movie searches during a queue sweep.
    search_delay: Duration,
    /// Movie ids with a search currently in flight. Two concurrent
    /// searches for the same movie would race on status writes, so
    /// the second caller gets `SearchInProgress` instead.
    in_flight: Mutex<HashSet<i64>>,
}

impl SearchOrchestrator {
    pub fn new(
        movies: Arc<dyn MovieStore>,
        events: Arc<dyn EventStore>,
        indexer: Arc<dyn IndexerClient>,
        downloader: Option<Arc<dyn DownloadClient>>,
        search_delay: Duration,
    ) -> Self {
        Self {
            movies,
            events,
            indexer,
            downloader,
            search_delay,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Run the full search workflow for one movie.
    ///
    /// Fails fast when the movie cannot be loaded or another search
    /// for it is already running; every later persistence failure is
    /// logged and the workflow continues.
    pub async fn search_for_movie(&self, movie_id: i64) -> Result<(), OrchestratorError> {
        {
            let mut in_flight = self.in_flight.lock().unwrap();
            if !in_flight.insert(movie_id) {
                return Err(OrchestratorError::SearchInProgress(movie_id));
            }
        }

        let result = self.run_search(movie_id).await;

        self.in_flight.lock().unwrap().remove(&movie_id);
        result
    }

    async fn run_search(&self, movie_id: i64) -> Result<(), OrchestratorError> {
        info!(movie_id = movie_id, "Starting torrent search");

        let mut movie = self.movies.get_by_id(movie_id)?;

        movie.status = MediaStatus::Searching;
        if let Err(e) = self.movies.set_status(movie_id, MediaStatus::Searching) {
            warn!("Failed to update movie status to searching: {}", e);
        }

        self.log_event(
            movie_id,
            MovieEventType::SearchStarted,
            &format!("Starting torrent search for {}", describe(&movie)),
            None,
        );

        let queries = build_search_queries(&movie.title, movie.year);
        metrics::QUERIES_PER_SEARCH
            .with_label_values(&[])
            .observe(queries.len() as f64);

        let mut all_candidates: Vec<ScoredCandidate> = Vec::new();
        let mut raw_total = 0usize;

        for query in &queries {
            let raw = self.run_query(query, &movie).await;
            raw_total += raw.len();
            all_candidates.extend(process_results(raw, &movie.title, movie.year));
        }

        metrics::RAW_RESULTS_SEEN
            .with_label_values(&[])
            .observe(raw_total as f64);

        let best_results = select_best(all_candidates);
        metrics::CANDIDATES_RANKED
            .with_label_values(&[])
            .observe(best_results.len() as f64);

        info!(
            movie_id = movie_id,
            candidates = best_results.len(),
            "Search finished for {}",
            describe(&movie)
        );

        if best_results.is_empty() {
            metrics::SEARCHES_TOTAL
                .with_label_values(&["not_found"])
                .inc();

            if let Err(e) = self.movies.set_status(movie_id, MediaStatus::NotFound) {
                warn!("Failed to update movie status to not_found: {}", e);
            }
            self.log_event(
                movie_id,
                MovieEventType::SearchFailed,
                &format!("No suitable torrents found for {}", describe(&movie)),
                Some(&EventDetails::SearchFailed {
                    search_queries: queries.len(),
                    total_results_found: raw_total,
                    reason: "no_quality_torrents_after_filtering".to_string(),
                }),
            );
            return Ok(());
        }

        metrics::SEARCHES_TOTAL.with_label_values(&["found"]).inc();

        self.log_event(
            movie_id,
            MovieEventType::SearchCompleted,
            &format!(
                "Found {} torrents for '{}'",
                best_results.len(),
                movie.title
            ),
            Some(&EventDetails::SearchCompleted {
                torrent_count: best_results.len(),
            }),
        );

        let best = &best_results[0];
        metrics::BEST_SCORE
            .with_label_values(&[])
            .observe(best.score as f64);

        info!(
            title = %best.title,
            seeders = best.seeders,
            size_gb = best.size_gb(),
            score = best.score,
            "Best torrent selected"
        );

        self.log_event(
            movie_id,
            MovieEventType::TorrentFound,
            &format!("Best torrent: {} (Score: {})", best.title, best.score),
            Some(&EventDetails::TorrentFound {
                title: best.title.clone(),
                seeders: best.seeders,
                size_gb: best.size_gb(),
                score: best.score,
                quality: best.quality.as_str().to_string(),
            }),
        );

        let Some(downloader) = self.downloader.as_ref() else {
            debug!("No download client configured, skipping download");
            return Ok(());
        };

        self.log_event(
            movie_id,
            MovieEventType::DownloadStarted,
            &format!("Starting download of '{}'", best.title),
            None,
        );

        match self.download_candidate(downloader.as_ref(), best, &mut movie).await {
            Ok(()) => {
                metrics::DOWNLOADS_STARTED.inc();

                let old_status = movie.status;
                movie.status = MediaStatus::Downloading;
                if let Err(e) = self.movies.set_status(movie_id, MediaStatus::Downloading) {
                    warn!("Failed to update movie status to downloading: {}", e);
                }
                info!(movie_id = movie_id, "Download initiated for '{}'", movie.title);

                self.log_event(
                    movie_id,
                    MovieEventType::StatusChanged,
                    &format!("Status changed to: {}", MediaStatus::Downloading),
                    Some(&EventDetails::StatusChanged {
                        old_status,
                        new_status: MediaStatus::Downloading,
                    }),
                );
                self.log_event(
                    movie_id,
                    MovieEventType::DownloadStarted,
                    &format!("Download initiated for '{}'", best.title),
                    None,
                );
            }
            Err(e) => {
                metrics::DOWNLOADS_FAILED.inc();
                warn!(movie_id = movie_id, "Download failed for '{}': {}", movie.title, e);
                // Status stays at searching so a later sweep retries
                // without re-queueing from wanted.
                self.log_event(
                    movie_id,
                    MovieEventType::DownloadFailed,
                    &format!("Download failed: {}", e),
                    None,
                );
            }
        }

        Ok(())
    }

    /// Run one query against the indexer: identifier search first,
    /// then the category ladder, then a generic last-resort search.
    /// Upstream failures count as zero results for that attempt.
    async fn run_query(&self, query: &str, movie: &Movie) -> Vec<RawCandidate> {
        debug!(query = query, "Searching indexer");

        if movie.imdb_id.as_deref().is_some_and(|s| !s.is_empty()) || movie.tmdb_id.is_some() {
            let params = MovieSearchParams {
                year: movie.year,
                imdb_id: movie.imdb_id.clone(),
                tmdb_id: movie.tmdb_id,
                category: Some(GENERIC_CATEGORY.to_string()),
                ..Default::default()
            };
            match self.indexer.search(&params).await {
                Ok(results) if !results.is_empty() => {
                    debug!(results = results.len(), "Found results using external ids");
                    metrics::EXTERNAL_SERVICE_REQUESTS
                        .with_label_values(&["jackett", "success"])
                        .inc();
                    return results;
                }
                Ok(_) => {}
                Err(e) => {
                    metrics::EXTERNAL_SERVICE_REQUESTS
                        .with_label_values(&["jackett", "error"])
                        .inc();
                    warn!("Id-based search failed: {}", e);
                }
            }
        }

        for category in MOVIE_CATEGORIES {
            let params = MovieSearchParams {
                query: query.to_string(),
                year: movie.year,
                category: Some((*category).to_string()),
                ..Default::default()
            };
            match self.indexer.search(&params).await {
                Ok(results) if !results.is_empty() => {
                    debug!(
                        results = results.len(),
                        category = category,
                        "Found results in category"
                    );
                    metrics::EXTERNAL_SERVICE_REQUESTS
                        .with_label_values(&["jackett", "success"])
                        .inc();
                    return results;
                }
                Ok(_) => {}
                Err(e) => {
                    metrics::EXTERNAL_SERVICE_REQUESTS
                        .with_label_values(&["jackett", "error"])
                        .inc();
                    warn!(category = category, "Category search failed: {}", e);
                }
            }
        }

        // Last resort: plain text search in the generic category.
        let params = MovieSearchParams {
            query: query.to_string(),
            category: Some(GENERIC_CATEGORY.to_string()),
            ..Default::default()
        };
        match self.indexer.search(&params).await {
            Ok(results) => {
                debug!(results = results.len(), "Generic search results");
                results
            }
            Err(e) => {
                warn!(query = query, "Generic search failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Hand the winning candidate to the download client, preferring
    /// the magnet URI, and persist the returned info hash.
    async fn download_candidate(
        &self,
        downloader: &dyn DownloadClient,
        best: &ScoredCandidate,
        movie: &mut Movie,
    ) -> Result<(), OrchestratorError> {
        let hash = if let Some(magnet) = best.usable_magnet() {
            debug!("Adding torrent via magnet URI for '{}'", movie.title);
            downloader.add_magnet(magnet).await?
        } else if let Some(url) = best.usable_download_url() {
            debug!("Adding torrent via file URL for '{}'", movie.title);
            downloader.add_torrent_url(url).await?
        } else {
            return Err(OrchestratorError::NoUsableSource);
        };

        if !hash.is_empty() {
            movie.torrent_hash = Some(hash);
            if let Err(e) = self.movies.update(movie) {
                warn!("Failed to persist torrent hash: {}", e);
            }
        }

        Ok(())
    }

    /// Sweep the library: search every movie in `wanted` or
    /// `not_found` status, sequentially, with a fixed delay between
    /// searches. Per-movie failures are logged and do not abort the
    /// sweep.
    pub async fn process_movie_queue(&self) -> Result<(), OrchestratorError> {
        let movies = self.movies.get_all()?;

        for movie in movies {
            if !movie.status.is_searchable() {
                continue;
            }

            tokio::time::sleep(self.search_delay).await;

            if let Err(e) = self.search_for_movie(movie.id).await {
                warn!(
                    movie_id = movie.id,
                    "Failed to search for '{}': {}", movie.title, e
                );
                self.log_event(
                    movie.id,
                    MovieEventType::SearchFailed,
                    &format!("Search error: {}", e),
                    Some(&EventDetails::SearchError {
                        error: e.to_string(),
                    }),
                );
            }
        }

        Ok(())
    }

    /// Append an event, logging on failure instead of propagating.
    fn log_event(
        &self,
        movie_id: i64,
        event_type: MovieEventType,
        message: &str,
        details: Option<&EventDetails>,
    ) {
        if let Err(e) = self.events.append(movie_id, event_type, message, details) {
            warn!(movie_id = movie_id, "Failed to log event: {}", e);
        }
    }
}

fn describe(movie: &Movie) -> String {
    match movie.year {
        Some(year) => format!("'{}' ({})", movie.title, year),
        None => format!("'{}'", movie.title),
    }
}

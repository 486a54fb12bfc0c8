//! Job scheduler implementation.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::SchedulerConfig;
use crate::events::{EventStore, MovieEventType};
use crate::library::{MediaStatus, MovieStore};
use crate::metrics;
use crate::orchestrator::SearchOrchestrator;

/// Schedules background searches over the movie library.
///
/// State machine: stopped -> `start` -> running -> `stop` -> stopped.
/// Both transitions are idempotent. `stop` signals cancellation and
/// joins every tracked task; on-demand triggers do not observe
/// cancellation mid-flight and always run to completion.
pub struct JobScheduler {
    orchestrator: Arc<SearchOrchestrator>,
    movies: Arc<dyn MovieStore>,
    events: Arc<dyn EventStore>,
    config: SchedulerConfig,

    running: Mutex<bool>,
    shutdown_tx: broadcast::Sender<()>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl JobScheduler {
    pub fn new(
        orchestrator: Arc<SearchOrchestrator>,
        movies: Arc<dyn MovieStore>,
        events: Arc<dyn EventStore>,
        config: SchedulerConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            orchestrator,
            movies,
            events,
            config,
            running: Mutex::new(false),
            shutdown_tx,
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn is_running(&self) -> bool {
        *self.running.lock().unwrap()
    }

    /// Start the periodic sweep loop. No-op when already running.
    pub fn start(self: &Arc<Self>) {
        let mut running = self.running.lock().unwrap();
        if *running {
            warn!("Job scheduler is already running");
            return;
        }
        *running = true;

        info!(
            interval_secs = self.config.sweep_interval_secs,
            "Starting job scheduler"
        );

        let scheduler = self.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let handle = tokio::spawn(async move {
            scheduler.run_sweep().await;

            let mut interval =
                tokio::time::interval(Duration::from_secs(scheduler.config.sweep_interval_secs));
            // The first tick fires immediately; consume it so the loop
            // waits a full interval after the startup sweep.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Periodic sweep loop stopped");
                        return;
                    }
                    _ = interval.tick() => {
                        info!("Running periodic library sweep");
                        scheduler.run_sweep().await;
                    }
                }
            }
        });

        self.tasks.lock().unwrap().push(handle);
    }

    /// Stop the scheduler: signal cancellation and wait for every
    /// tracked task (periodic loop and on-demand triggers) to finish.
    /// No-op when already stopped.
    pub async fn stop(&self) {
        {
            let mut running = self.running.lock().unwrap();
            if !*running {
                return;
            }
            *running = false;
        }

        info!("Stopping job scheduler");
        let _ = self.shutdown_tx.send(());

        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap());
        futures::future::join_all(tasks).await;
        info!("Job scheduler stopped");
    }

    /// Fire-and-forget search for one movie. Errors are logged, never
    /// returned; the task is tracked so `stop` can join it.
    pub fn trigger_search_for_movie(self: &Arc<Self>, movie_id: i64) {
        let scheduler = self.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = scheduler.orchestrator.search_for_movie(movie_id).await {
                error!(movie_id = movie_id, "Triggered search failed: {}", e);
                metrics::SEARCHES_TOTAL.with_label_values(&["error"]).inc();
            }
        });
        self.tasks.lock().unwrap().push(handle);
    }

    /// Best-effort cancellation for one movie: an in-flight search is
    /// not interrupted, but a movie stuck in `searching` or
    /// `downloading` is forced to `failed` so future sweeps skip it.
    pub fn cancel_jobs_for_movie(&self, movie_id: i64) {
        if !self.is_running() {
            return;
        }

        info!(movie_id = movie_id, "Cancelling jobs for movie");

        let movie = match self.movies.get_by_id(movie_id) {
            Ok(movie) => movie,
            Err(e) => {
                warn!(movie_id = movie_id, "Cannot cancel jobs: {}", e);
                return;
            }
        };

        if movie.status == MediaStatus::Searching || movie.status == MediaStatus::Downloading {
            if let Err(e) = self.movies.set_status(movie_id, MediaStatus::Failed) {
                warn!("Failed to update movie status during cancellation: {}", e);
                return;
            }
            if let Err(e) = self.events.append(
                movie_id,
                MovieEventType::JobCancelled,
                &format!("Cancelled active job for '{}'", movie.title),
                None,
            ) {
                warn!("Failed to log cancellation event: {}", e);
            }
        }
    }

    /// One library sweep plus the event retention purge.
    async fn run_sweep(&self) {
        let start = Instant::now();

        if let Err(e) = self.orchestrator.process_movie_queue().await {
            error!("Library sweep failed: {}", e);
        }

        metrics::SWEEPS_TOTAL.inc();
        metrics::SWEEP_DURATION
            .with_label_values(&[])
            .observe(start.elapsed().as_secs_f64());

        match self.events.delete_older_than(self.config.event_retention_days) {
            Ok(0) => {}
            Ok(removed) => {
                info!(removed = removed, "Purged old events");
                metrics::EVENTS_PURGED.inc_by(removed);
            }
            Err(e) => warn!("Event retention purge failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SqliteEventStore;
    use crate::library::{NewMovie, SqliteMovieStore};
    use crate::testing::MockIndexer;

    fn scheduler() -> (Arc<JobScheduler>, Arc<SqliteMovieStore>, Arc<SqliteEventStore>) {
        let movies = Arc::new(SqliteMovieStore::in_memory().unwrap());
        let events = Arc::new(SqliteEventStore::in_memory().unwrap());
        let orchestrator = Arc::new(SearchOrchestrator::new(
            movies.clone(),
            events.clone(),
            Arc::new(MockIndexer::empty()),
            None,
            Duration::from_millis(0),
        ));
        let scheduler = Arc::new(JobScheduler::new(
            orchestrator,
            movies.clone(),
            events.clone(),
            SchedulerConfig {
                sweep_interval_secs: 3600,
                search_delay_secs: 0,
                event_retention_days: 30,
            },
        ));
        (scheduler, movies, events)
    }

    #[tokio::test]
    async fn test_start_stop_idempotent() {
        let (scheduler, _, _) = scheduler();

        assert!(!scheduler.is_running());
        scheduler.start();
        assert!(scheduler.is_running());

        // Second start is a no-op: still exactly one sweep task.
        scheduler.start();
        assert_eq!(scheduler.tasks.lock().unwrap().len(), 1);

        scheduler.stop().await;
        assert!(!scheduler.is_running());

        // Second stop is a no-op.
        scheduler.stop().await;
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn test_trigger_runs_to_completion_before_stop_returns() {
        let (scheduler, movies, _) = scheduler();
        let movie = movies.insert(NewMovie::new("Jaws", Some(1975))).unwrap();

        scheduler.start();
        scheduler.trigger_search_for_movie(movie.id);
        scheduler.stop().await;

        // The triggered search finished before stop returned; with an
        // empty indexer the movie ends in not_found.
        assert_eq!(
            movies.get_by_id(movie.id).unwrap().status,
            MediaStatus::NotFound
        );
    }

    #[tokio::test]
    async fn test_cancel_forces_failed_status() {
        let (scheduler, movies, events) = scheduler();
        let movie = movies.insert(NewMovie::new("Jaws", Some(1975))).unwrap();
        movies.set_status(movie.id, MediaStatus::Searching).unwrap();

        scheduler.start();
        scheduler.cancel_jobs_for_movie(movie.id);

        assert_eq!(
            movies.get_by_id(movie.id).unwrap().status,
            MediaStatus::Failed
        );
        let log = events.list_for_movie(movie.id).unwrap();
        assert!(log
            .iter()
            .any(|e| e.event_type == MovieEventType::JobCancelled));

        scheduler.stop().await;
    }

    #[tokio::test]
    async fn test_cancel_ignores_terminal_statuses() {
        let (scheduler, movies, _) = scheduler();
        let movie = movies.insert(NewMovie::new("Jaws", Some(1975))).unwrap();
        movies.set_status(movie.id, MediaStatus::Ready).unwrap();

        scheduler.start();
        scheduler.cancel_jobs_for_movie(movie.id);

        assert_eq!(movies.get_by_id(movie.id).unwrap().status, MediaStatus::Ready);
        scheduler.stop().await;
    }

    #[tokio::test]
    async fn test_cancel_is_noop_when_stopped() {
        let (scheduler, movies, _) = scheduler();
        let movie = movies.insert(NewMovie::new("Jaws", Some(1975))).unwrap();
        movies.set_status(movie.id, MediaStatus::Searching).unwrap();

        scheduler.cancel_jobs_for_movie(movie.id);

        assert_eq!(
            movies.get_by_id(movie.id).unwrap().status,
            MediaStatus::Searching
        );
    }
}

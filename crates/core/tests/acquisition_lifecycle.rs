//! End-to-end tests for the search-and-acquire workflow, from a
//! wanted movie through candidate selection to the download client.

use std::sync::Arc;
use std::time::Duration;

use cinefetch_core::downloader::DownloadClient;
use cinefetch_core::events::{EventStore, MovieEventType, SqliteEventStore};
use cinefetch_core::indexer::{IndexerClient, IndexerError, MovieSearchParams, RawCandidate};
use cinefetch_core::library::{MediaStatus, MovieStore, NewMovie, SqliteMovieStore};
use cinefetch_core::testing::{fixtures, MockDownloadClient, MockIndexer};
use cinefetch_core::{OrchestratorError, SearchOrchestrator};

fn orchestrator(
    indexer: MockIndexer,
    downloader: Option<MockDownloadClient>,
) -> (SearchOrchestrator, Arc<SqliteMovieStore>, Arc<SqliteEventStore>) {
    let movies = Arc::new(SqliteMovieStore::in_memory().unwrap());
    let events = Arc::new(SqliteEventStore::in_memory().unwrap());
    let orchestrator = SearchOrchestrator::new(
        movies.clone(),
        events.clone(),
        Arc::new(indexer),
        downloader.map(|d| Arc::new(d) as Arc<dyn DownloadClient>),
        Duration::from_millis(0),
    );
    (orchestrator, movies, events)
}

#[tokio::test]
async fn full_acquisition_picks_the_best_candidate() {
    // The indexer mixes one healthy release with junk that filtering
    // must drop: a dead torrent and a cam rip.
    let healthy = fixtures::release(
        "The Matrix 1999 1080p BluRay x264-SPARKS",
        "0123456789abcdef0123456789abcdef01234567",
    );
    let mut cam = fixtures::release("The Matrix 1999 CAM XviD", "feedfacefeedfacefeedfacefeedfacefeedface");
    cam.seeders = 500;
    let indexer = MockIndexer::with_results(vec![
        fixtures::dead_release("The Matrix 1999 2160p REMUX"),
        cam,
        healthy,
    ]);
    let downloader = MockDownloadClient::new();
    let (orchestrator, movies, events) = orchestrator(indexer, Some(downloader.clone()));

    let movie = movies
        .insert(NewMovie::new("The Matrix", Some(1999)))
        .unwrap();
    orchestrator.search_for_movie(movie.id).await.unwrap();

    let loaded = movies.get_by_id(movie.id).unwrap();
    assert_eq!(loaded.status, MediaStatus::Downloading);
    assert_eq!(
        loaded.torrent_hash.as_deref(),
        Some("0123456789abcdef0123456789abcdef01234567")
    );

    let magnets = downloader.added_magnets();
    assert_eq!(magnets.len(), 1);
    assert!(magnets[0].contains("0123456789abcdef"));

    let types: Vec<_> = events
        .list_for_movie(movie.id)
        .unwrap()
        .into_iter()
        .map(|e| e.event_type)
        .collect();
    assert_eq!(
        types,
        vec![
            MovieEventType::SearchStarted,
            MovieEventType::SearchCompleted,
            MovieEventType::TorrentFound,
            MovieEventType::DownloadStarted,
            MovieEventType::StatusChanged,
            MovieEventType::DownloadStarted,
        ]
    );
}

#[tokio::test]
async fn url_only_candidate_goes_through_torrent_file_add() {
    let indexer = MockIndexer::with_results(vec![fixtures::url_only_release(
        "Alien 1979 1080p BluRay x264-SPARKS",
        "http://tracker.example/dl/alien.torrent",
    )]);
    let downloader = MockDownloadClient::new();
    let (orchestrator, movies, _) = orchestrator(indexer, Some(downloader.clone()));

    let movie = movies.insert(NewMovie::new("Alien", Some(1979))).unwrap();
    orchestrator.search_for_movie(movie.id).await.unwrap();

    assert!(downloader.added_magnets().is_empty());
    assert_eq!(
        downloader.added_urls(),
        vec!["http://tracker.example/dl/alien.torrent".to_string()]
    );

    let loaded = movies.get_by_id(movie.id).unwrap();
    assert_eq!(loaded.status, MediaStatus::Downloading);
    assert_eq!(loaded.torrent_hash.as_deref(), Some("cafebabe"));
}

#[tokio::test]
async fn movie_without_results_becomes_searchable_again() {
    let indexer = MockIndexer::with_results(Vec::new());
    let (orchestrator, movies, events) = orchestrator(indexer.clone(), None);

    let movie = movies.insert(NewMovie::new("Jaws", Some(1975))).unwrap();
    orchestrator.process_movie_queue().await.unwrap();

    assert_eq!(
        movies.get_by_id(movie.id).unwrap().status,
        MediaStatus::NotFound
    );

    // A later sweep retries the movie once the indexer has something.
    indexer.set_results(vec![fixtures::release(
        "Jaws 1975 1080p BluRay x265-TIGOLE",
        "aaaabbbbccccddddeeeeffff0000111122223333",
    )]);
    orchestrator.process_movie_queue().await.unwrap();

    // Without a download client the workflow stops after selection.
    let log = events.list_for_movie(movie.id).unwrap();
    assert!(log
        .iter()
        .any(|e| e.event_type == MovieEventType::TorrentFound));
}

#[tokio::test]
async fn external_ids_drive_the_search_when_present() {
    let indexer = MockIndexer::with_results(vec![fixtures::release(
        "The Matrix 1999 1080p BluRay x264-SPARKS",
        "0123456789abcdef0123456789abcdef01234567",
    )]);
    let calls = indexer.calls();
    let (orchestrator, movies, _) = orchestrator(indexer, None);

    let movie = movies
        .insert(NewMovie::new("The Matrix", Some(1999)).with_imdb_id("tt0133093"))
        .unwrap();
    orchestrator.search_for_movie(movie.id).await.unwrap();

    // Every request that produced results carried the IMDb id; the
    // text query and category ladder were never reached.
    let calls = calls.lock().unwrap();
    assert!(!calls.is_empty());
    for params in calls.iter() {
        assert_eq!(params.imdb_id.as_deref(), Some("tt0133093"));
        assert!(params.query.is_empty());
    }
}

/// Indexer whose searches block until released, so a test can hold a
/// search in flight.
struct BlockingIndexer {
    gate: Arc<tokio::sync::Notify>,
}

#[async_trait::async_trait]
impl IndexerClient for BlockingIndexer {
    async fn search(
        &self,
        _params: &MovieSearchParams,
    ) -> Result<Vec<RawCandidate>, IndexerError> {
        self.gate.notified().await;
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn concurrent_search_for_same_movie_is_rejected() {
    let gate = Arc::new(tokio::sync::Notify::new());
    let movies = Arc::new(SqliteMovieStore::in_memory().unwrap());
    let events = Arc::new(SqliteEventStore::in_memory().unwrap());
    let orchestrator = Arc::new(SearchOrchestrator::new(
        movies.clone(),
        events,
        Arc::new(BlockingIndexer { gate: gate.clone() }),
        None,
        Duration::from_millis(0),
    ));

    let movie = movies.insert(NewMovie::new("Jaws", Some(1975))).unwrap();

    let first = {
        let orchestrator = orchestrator.clone();
        let movie_id = movie.id;
        tokio::spawn(async move { orchestrator.search_for_movie(movie_id).await })
    };

    // Let the first search acquire its lease and park on the indexer.
    tokio::task::yield_now().await;

    let err = orchestrator.search_for_movie(movie.id).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::SearchInProgress(id) if id == movie.id));

    // Release the in-flight search; the lease is returned afterwards
    // so a fresh search is allowed again.
    loop {
        gate.notify_waiters();
        tokio::task::yield_now().await;
        if first.is_finished() {
            break;
        }
    }
    first.await.unwrap().unwrap();
}

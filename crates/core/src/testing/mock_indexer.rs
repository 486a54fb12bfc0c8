//! Mock indexer for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::indexer::{IndexerClient, IndexerError, MovieSearchParams, RawCandidate};

/// Mock implementation of the IndexerClient trait.
///
/// Returns a fixed result set for every search and records every
/// request for assertions. Can be configured to fail instead.
#[derive(Clone)]
pub struct MockIndexer {
    results: Arc<Mutex<Vec<RawCandidate>>>,
    calls: Arc<Mutex<Vec<MovieSearchParams>>>,
    fail: bool,
}

impl MockIndexer {
    /// A mock that returns zero results for every search.
    pub fn empty() -> Self {
        Self::with_results(Vec::new())
    }

    /// A mock that returns the given results for every search.
    pub fn with_results(results: Vec<RawCandidate>) -> Self {
        Self {
            results: Arc::new(Mutex::new(results)),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// A mock whose every search fails with a connection error.
    pub fn failing() -> Self {
        Self {
            results: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// Replace the configured results.
    pub fn set_results(&self, results: Vec<RawCandidate>) {
        *self.results.lock().unwrap() = results;
    }

    /// Handle to the recorded search requests.
    pub fn calls(&self) -> Arc<Mutex<Vec<MovieSearchParams>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl IndexerClient for MockIndexer {
    async fn search(&self, params: &MovieSearchParams) -> Result<Vec<RawCandidate>, IndexerError> {
        self.calls.lock().unwrap().push(params.clone());

        if self.fail {
            return Err(IndexerError::ConnectionFailed(
                "mock indexer is down".to_string(),
            ));
        }

        Ok(self.results.lock().unwrap().clone())
    }
}

//! Search orchestration.
//!
//! Runs the end-to-end search-and-acquire workflow for one movie:
//! build queries, call the indexer, feed results through the selection
//! engine, hand the winner to the download client, and keep the
//! persisted status and event log consistent with the outcome.

mod search;
mod types;

pub use search::SearchOrchestrator;
pub use types::OrchestratorError;

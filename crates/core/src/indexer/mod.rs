//! Torrent indexer search backend.
//!
//! A single trait over "send a movie query, get raw candidates back".
//! The only production implementation talks to a Jackett aggregator;
//! everything downstream of this module is pure and testable against
//! hand-built candidate lists.

mod jackett;
mod types;

pub use jackett::JackettClient;
pub use types::{IndexerClient, IndexerError, MovieSearchParams, RawCandidate};

// Event store port.
//
// Streams are append-only and versioned by event count. An append only lands
// when `expected_version` still equals the stream's current version.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventStoreError {
    #[error("stream moved on: expected version {expected}, found {actual}")]
    VersionMismatch { expected: i64, actual: i64 },

    #[error("event store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone)]
pub struct LoadedStream<E> {
    pub events: Vec<E>,
    pub version: i64,
}

#[async_trait]
pub trait EventStore<Event: Clone + Send + Sync + 'static>: Send + Sync {
    /// An unknown stream loads as empty at version 0.
    async fn load(&self, stream_id: &str) -> Result<LoadedStream<Event>, EventStoreError>;

    async fn append(
        &self,
        stream_id: &str,
        expected_version: i64,
        new_events: &[Event],
    ) -> Result<(), EventStoreError>;
}

pub mod in_memory;

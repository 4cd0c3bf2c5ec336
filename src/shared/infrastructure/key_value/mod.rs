// Port for a small persistent key-value store holding serialized documents.
//
// Purpose
// - Give the local backend a place to keep its JSON array of records and the
//   current session, one namespaced key each.
//
// Boundaries
// - Values are opaque strings. Serialization belongs to the callers.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyValueError {
    #[error("key-value store unavailable: {0}")]
    Unavailable(String),

    #[error("key-value store corrupted: {0}")]
    Corrupted(String),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueError>;
    async fn set(&self, key: &str, value: String) -> Result<(), KeyValueError>;
    async fn remove(&self, key: &str) -> Result<(), KeyValueError>;
}

pub mod in_memory;
pub mod json_file;

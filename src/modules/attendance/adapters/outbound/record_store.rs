// Record store port: the single interface the dashboard and the API talk to.
//
// Purpose
// - Hide whether records live in the synchronized (event sourced) store or in
//   the local key-value document.
//
// Delivery
// - `changes()` returns a revision receiver for push stores and `None` for pull
//   stores. `subscribe` turns either into a feed of full ordered listings.
// - A listing carries the revision read just before it was taken, so it
//   reflects every change up to that revision. Pull stores have none.

use crate::modules::attendance::core::record::{AttendanceRecord, RecordOwner, ValidationError};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("attendance record {id} not found")]
    NotFound { id: String },

    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Records newest first. `owner_id` of `None` lists every owner.
    async fn list_records(&self, owner_id: Option<&str>)
    -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn add_record(
        &self,
        owner: &RecordOwner,
        display_name: &str,
    ) -> Result<AttendanceRecord, StoreError>;

    /// `requested_by` is the acting viewer. With an owner filter, records of
    /// other owners are reported as `NotFound`.
    async fn delete_record(
        &self,
        id: &str,
        requested_by: &str,
        owner_id: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Removes every record visible under the filter and returns how many went.
    async fn clear_records(
        &self,
        requested_by: &str,
        owner_id: Option<&str>,
    ) -> Result<usize, StoreError>;

    fn changes(&self) -> Option<watch::Receiver<u64>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub revision: Option<u64>,
    pub records: Result<Vec<AttendanceRecord>, StoreError>,
}

pub async fn list_at(store: &dyn RecordStore, owner_id: Option<&str>) -> Listing {
    let revision = store.changes().map(|changes| *changes.borrow());
    Listing {
        revision,
        records: store.list_records(owner_id).await,
    }
}

/// Handle of a running listing feed. Dropping it stops the feed.
#[derive(Debug)]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Deliver the ordered listing once, then again after every store change for
/// push stores. Pull stores deliver once and the feed ends.
pub fn subscribe<F>(
    store: Arc<dyn RecordStore>,
    owner_id: Option<String>,
    mut on_listing: F,
) -> Subscription
where
    F: FnMut(Listing) + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut changes = store.changes();
        loop {
            let revision = changes.as_mut().map(|changes| *changes.borrow_and_update());
            let records = store.list_records(owner_id.as_deref()).await;
            on_listing(Listing { revision, records });
            match changes.as_mut() {
                Some(changes) => {
                    if changes.changed().await.is_err() {
                        debug!("record store closed its change feed");
                        break;
                    }
                }
                None => break,
            }
        }
    });
    Subscription { task }
}

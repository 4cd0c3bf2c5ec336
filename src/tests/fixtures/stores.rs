// Shared record store fixtures: owners, a ready synchronized store and a store
// whose listings can be held back to simulate slow reads.

use crate::modules::attendance::adapters::outbound::projections_in_memory::InMemoryProjections;
use crate::modules::attendance::adapters::outbound::record_store::{RecordStore, StoreError};
use crate::modules::attendance::adapters::outbound::synchronized_store::SynchronizedRecordStore;
use crate::modules::attendance::core::events::AttendanceEvent;
use crate::modules::attendance::core::record::{AttendanceRecord, RecordOwner};
use crate::shared::infrastructure::event_store::in_memory::InMemoryEventStore;
use crate::tests::fixtures::clock::ManualClock;
use std::sync::Arc;
use tokio::sync::watch;

pub type InMemorySynchronizedStore =
    SynchronizedRecordStore<InMemoryEventStore<AttendanceEvent>, InMemoryProjections>;

pub fn alice() -> RecordOwner {
    RecordOwner {
        id: "user-fixed-0001".into(),
        label: "alice@example.com".into(),
    }
}

pub fn bob() -> RecordOwner {
    RecordOwner {
        id: "user-fixed-0002".into(),
        label: "bob@example.com".into(),
    }
}

pub fn synchronized_store(clock: ManualClock) -> InMemorySynchronizedStore {
    SynchronizedRecordStore::new(
        Arc::new(InMemoryEventStore::new()),
        Arc::new(InMemoryProjections::new()),
        Arc::new(clock),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Hold {
    Released,
    Everything,
    Owner(String),
}

impl Hold {
    fn applies_to(&self, owner_id: Option<&str>) -> bool {
        match self {
            Hold::Released => false,
            Hold::Everything => true,
            Hold::Owner(id) => owner_id == Some(id.as_str()),
        }
    }
}

/// Delegates to an inner store. While held, listings are computed but not
/// returned until `release` is called.
pub struct HeldListingStore {
    inner: Arc<dyn RecordStore>,
    held: watch::Sender<Hold>,
    waiting: watch::Sender<usize>,
}

impl HeldListingStore {
    pub fn new(inner: Arc<dyn RecordStore>) -> Self {
        Self {
            inner,
            held: watch::channel(Hold::Released).0,
            waiting: watch::channel(0).0,
        }
    }

    pub fn hold(&self) {
        self.held.send_replace(Hold::Everything);
    }

    /// Hold only listings filtered to `owner_id`.
    pub fn hold_owner(&self, owner_id: &str) {
        self.held.send_replace(Hold::Owner(owner_id.to_string()));
    }

    pub fn release(&self) {
        self.held.send_replace(Hold::Released);
    }

    /// Resolves once at least one listing is parked behind the hold.
    pub async fn listing_in_flight(&self) {
        let mut waiting = self.waiting.subscribe();
        let _ = waiting.wait_for(|count| *count > 0).await;
    }
}

#[async_trait::async_trait]
impl RecordStore for HeldListingStore {
    async fn list_records(
        &self,
        owner_id: Option<&str>,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let listing = self.inner.list_records(owner_id).await;
        let mut held = self.held.subscribe();
        let is_held = held.borrow_and_update().applies_to(owner_id);
        if is_held {
            self.waiting.send_modify(|count| *count += 1);
            let _ = held.wait_for(|hold| !hold.applies_to(owner_id)).await;
            self.waiting.send_modify(|count| *count -= 1);
        }
        listing
    }

    async fn add_record(
        &self,
        owner: &RecordOwner,
        display_name: &str,
    ) -> Result<AttendanceRecord, StoreError> {
        self.inner.add_record(owner, display_name).await
    }

    async fn delete_record(
        &self,
        id: &str,
        requested_by: &str,
        owner_id: Option<&str>,
    ) -> Result<(), StoreError> {
        self.inner.delete_record(id, requested_by, owner_id).await
    }

    async fn clear_records(
        &self,
        requested_by: &str,
        owner_id: Option<&str>,
    ) -> Result<usize, StoreError> {
        self.inner.clear_records(requested_by, owner_id).await
    }

    fn changes(&self) -> Option<watch::Receiver<u64>> {
        self.inner.changes()
    }
}

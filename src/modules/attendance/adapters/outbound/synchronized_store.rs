// Synchronized record store: event sourced writes, projected reads, pushed changes.
//
// Responsibilities
// - Assign ids and creation timestamps on the store side.
// - Run commands through the deciders and append to the event store.
// - Project committed events inline so the next listing sees them.
// - Expose the projection revision as the change feed.

use crate::modules::attendance::adapters::outbound::projections::AttendanceProjectionRepository;
use crate::modules::attendance::adapters::outbound::record_store::{RecordStore, StoreError};
use crate::modules::attendance::core::decision::DecideError;
use crate::modules::attendance::core::events::AttendanceEvent;
use crate::modules::attendance::core::record::{
    AttendanceRecord, RecordOwner, normalize_display_name,
};
use crate::modules::attendance::use_cases::command_pipeline::{ApplicationError, Committed};
use crate::modules::attendance::use_cases::delete_attendance::command::DeleteAttendance;
use crate::modules::attendance::use_cases::delete_attendance::handler::DeleteAttendanceHandler;
use crate::modules::attendance::use_cases::list_attendance::handler::Projector;
use crate::modules::attendance::use_cases::list_attendance::queries_port::AttendanceQueries;
use crate::modules::attendance::use_cases::record_attendance::command::RecordAttendance;
use crate::modules::attendance::use_cases::record_attendance::handler::RecordAttendanceHandler;
use crate::shared::core::primitives::{Clock, new_id};
use crate::shared::infrastructure::event_store::EventStore;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

pub const PROJECTOR_NAME: &str = "attendance_records";

pub fn stream_id(record_id: &str) -> String {
    format!("AttendanceRecord-{record_id}")
}

pub struct SynchronizedRecordStore<TEventStore, TProjections>
where
    TEventStore: EventStore<AttendanceEvent> + Send + Sync + 'static,
    TProjections: AttendanceProjectionRepository
        + AttendanceQueries
        + Send
        + Sync
        + 'static,
{
    record_handler: RecordAttendanceHandler<TEventStore>,
    delete_handler: DeleteAttendanceHandler<TEventStore>,
    projector: Projector<TProjections>,
    queries: Arc<TProjections>,
    clock: Arc<dyn Clock>,
}

impl<TEventStore, TProjections> SynchronizedRecordStore<TEventStore, TProjections>
where
    TEventStore: EventStore<AttendanceEvent> + Send + Sync + 'static,
    TProjections: AttendanceProjectionRepository
        + AttendanceQueries
        + Send
        + Sync
        + 'static,
{
    pub fn new(
        event_store: Arc<TEventStore>,
        projections: Arc<TProjections>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            record_handler: RecordAttendanceHandler::new(event_store.clone()),
            delete_handler: DeleteAttendanceHandler::new(event_store),
            projector: Projector::new(PROJECTOR_NAME, projections.clone()),
            queries: projections,
            clock,
        }
    }

    async fn project(&self, committed: &Committed) -> Result<(), StoreError> {
        for (version, event) in committed.versioned() {
            self.projector
                .apply_one(&committed.stream_id, version, event)
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        }
        Ok(())
    }
}

fn store_error(record_id: &str, error: ApplicationError) -> StoreError {
    match error {
        ApplicationError::Domain(DecideError::Invalid(e)) => StoreError::Validation(e),
        ApplicationError::Domain(DecideError::NotFound) => StoreError::NotFound {
            id: record_id.to_string(),
        },
        other => StoreError::Unavailable(other.to_string()),
    }
}

#[async_trait::async_trait]
impl<TEventStore, TProjections> RecordStore for SynchronizedRecordStore<TEventStore, TProjections>
where
    TEventStore: EventStore<AttendanceEvent> + Send + Sync + 'static,
    TProjections: AttendanceProjectionRepository
        + AttendanceQueries
        + Send
        + Sync
        + 'static,
{
    async fn list_records(
        &self,
        owner_id: Option<&str>,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.queries
            .list(owner_id)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn add_record(
        &self,
        owner: &RecordOwner,
        display_name: &str,
    ) -> Result<AttendanceRecord, StoreError> {
        let display_name = normalize_display_name(display_name)?;
        let record_id = new_id();
        let stream_id = stream_id(&record_id);
        let command = RecordAttendance {
            record_id: record_id.clone(),
            owner_id: owner.id.clone(),
            owner_label: owner.label.clone(),
            display_name,
            created_at: self.clock.now_millis(),
        };

        let committed = self
            .record_handler
            .handle(&stream_id, command)
            .await
            .map_err(|e| store_error(&record_id, e))?;
        self.project(&committed).await?;

        match committed.events.into_iter().next() {
            Some(AttendanceEvent::AttendanceRecordedV1(e)) => {
                info!(record_id = %e.record_id, owner_id = %e.owner_id, "attendance recorded");
                Ok(AttendanceRecord {
                    id: e.record_id,
                    owner_id: e.owner_id,
                    owner_label: e.owner_label,
                    display_name: e.display_name,
                    created_at: e.created_at,
                    date: None,
                    time: None,
                })
            }
            _ => Err(StoreError::Unavailable(
                "recording produced no attendance event".into(),
            )),
        }
    }

    async fn delete_record(
        &self,
        id: &str,
        requested_by: &str,
        owner_id: Option<&str>,
    ) -> Result<(), StoreError> {
        let command = DeleteAttendance {
            record_id: id.to_string(),
            requested_by: requested_by.to_string(),
            owner_filter: owner_id.map(str::to_string),
            deleted_at: self.clock.now_millis(),
        };
        let committed = self
            .delete_handler
            .handle(&stream_id(id), command)
            .await
            .map_err(|e| store_error(id, e))?;
        self.project(&committed).await?;
        info!(record_id = %id, requested_by, "attendance record deleted");
        Ok(())
    }

    async fn clear_records(
        &self,
        requested_by: &str,
        owner_id: Option<&str>,
    ) -> Result<usize, StoreError> {
        let mut removed = 0;
        for record in self.list_records(owner_id).await? {
            match self.delete_record(&record.id, requested_by, owner_id).await {
                Ok(()) => removed += 1,
                // Removed concurrently by another writer.
                Err(StoreError::NotFound { id }) => warn!(record_id = %id, "already removed"),
                Err(e) => return Err(e),
            }
        }
        Ok(removed)
    }

    fn changes(&self) -> Option<watch::Receiver<u64>> {
        Some(self.queries.watch())
    }
}

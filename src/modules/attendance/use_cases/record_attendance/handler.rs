use crate::modules::attendance::core::events::AttendanceEvent;
use crate::modules::attendance::use_cases::command_pipeline::{
    ApplicationError, Committed, execute,
};
use crate::modules::attendance::use_cases::record_attendance::command::RecordAttendance;
use crate::modules::attendance::use_cases::record_attendance::decide::decide_record;
use crate::shared::infrastructure::event_store::EventStore;
use std::sync::Arc;

pub struct RecordAttendanceHandler<TEventStore>
where
    TEventStore: EventStore<AttendanceEvent> + Send + Sync + 'static,
{
    event_store: Arc<TEventStore>,
}

impl<TEventStore> RecordAttendanceHandler<TEventStore>
where
    TEventStore: EventStore<AttendanceEvent> + Send + Sync + 'static,
{
    pub fn new(event_store: Arc<TEventStore>) -> Self {
        Self { event_store }
    }

    pub async fn handle(
        &self,
        stream_id: &str,
        command: RecordAttendance,
    ) -> Result<Committed, ApplicationError> {
        execute(&*self.event_store, stream_id, |state| {
            decide_record(state, command)
        })
        .await
    }
}

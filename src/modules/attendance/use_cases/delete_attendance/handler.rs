use crate::modules::attendance::core::events::AttendanceEvent;
use crate::modules::attendance::use_cases::command_pipeline::{
    ApplicationError, Committed, execute,
};
use crate::modules::attendance::use_cases::delete_attendance::command::DeleteAttendance;
use crate::modules::attendance::use_cases::delete_attendance::decide::decide_delete;
use crate::shared::infrastructure::event_store::EventStore;
use std::sync::Arc;

pub struct DeleteAttendanceHandler<TEventStore>
where
    TEventStore: EventStore<AttendanceEvent> + Send + Sync + 'static,
{
    event_store: Arc<TEventStore>,
}

impl<TEventStore> DeleteAttendanceHandler<TEventStore>
where
    TEventStore: EventStore<AttendanceEvent> + Send + Sync + 'static,
{
    pub fn new(event_store: Arc<TEventStore>) -> Self {
        Self { event_store }
    }

    pub async fn handle(
        &self,
        stream_id: &str,
        command: DeleteAttendance,
    ) -> Result<Committed, ApplicationError> {
        execute(&*self.event_store, stream_id, |state| {
            decide_delete(state, command)
        })
        .await
    }
}

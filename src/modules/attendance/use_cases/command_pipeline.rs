// Shared load -> fold -> decide -> append pipeline for record commands.

use crate::modules::attendance::core::decision::{DecideError, Decision};
use crate::modules::attendance::core::events::AttendanceEvent;
use crate::modules::attendance::core::evolve::evolve;
use crate::modules::attendance::core::state::AttendanceState;
use crate::shared::infrastructure::event_store::{EventStore, EventStoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    EventStore(#[from] EventStoreError),

    #[error("domain rejected: {0}")]
    Domain(#[from] DecideError),
}

/// Events appended by one accepted command.
/// `starting_version` is the stream version before the append; the event at
/// index `i` lives at `starting_version + i + 1`.
#[derive(Debug, Clone)]
pub struct Committed {
    pub stream_id: String,
    pub starting_version: i64,
    pub events: Vec<AttendanceEvent>,
}

impl Committed {
    pub fn versioned(&self) -> impl Iterator<Item = (i64, &AttendanceEvent)> {
        self.events
            .iter()
            .enumerate()
            .map(|(i, event)| (self.starting_version + i as i64 + 1, event))
    }
}

pub async fn execute<TEventStore>(
    event_store: &TEventStore,
    stream_id: &str,
    decide: impl FnOnce(&AttendanceState) -> Decision,
) -> Result<Committed, ApplicationError>
where
    TEventStore: EventStore<AttendanceEvent> + ?Sized,
{
    let stream = event_store.load(stream_id).await?;
    let state = stream
        .events
        .iter()
        .cloned()
        .fold(AttendanceState::None, evolve);

    match decide(&state) {
        Decision::Accepted { events } => {
            event_store
                .append(stream_id, stream.version, &events)
                .await?;
            Ok(Committed {
                stream_id: stream_id.to_string(),
                starting_version: stream.version,
                events,
            })
        }
        Decision::Rejected { reason } => Err(ApplicationError::Domain(reason)),
    }
}

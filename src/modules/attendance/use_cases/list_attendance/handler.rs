use crate::modules::attendance::adapters::outbound::projections::AttendanceProjectionRepository;
use crate::modules::attendance::core::events::AttendanceEvent;
use crate::modules::attendance::core::projections::{Mutation, apply};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct Projector<TRepository>
where
    TRepository: AttendanceProjectionRepository + Send + Sync + 'static,
{
    pub name: String,
    pub repository: Arc<TRepository>,
}

impl<TRepository> Projector<TRepository>
where
    TRepository: AttendanceProjectionRepository + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, repository: Arc<TRepository>) -> Self {
        Self {
            name: name.into(),
            repository,
        }
    }

    pub async fn apply_one(
        &self,
        stream_id: &str,
        version: i64,
        event: &AttendanceEvent,
    ) -> anyhow::Result<()> {
        for mutation in apply(event) {
            match mutation {
                Mutation::Upsert(row) => self.repository.upsert(row).await?,
                Mutation::Remove { record_id } => self.repository.remove(&record_id).await?,
            }
        }
        debug!(projector = %self.name, stream_id, version, "projected");
        Ok(())
    }
}

use async_graphql::{Context, ID, Object, Result as GqlResult};

use crate::modules::attendance::core::record::AttendanceRecord;
use crate::modules::dashboard::core::renderer::DisplayFormat;
use crate::modules::session::adapters::inbound::graphql::require_session;
use crate::shell::state::AppState;

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlRecord {
    pub id: ID,
    pub owner_id: String,
    pub owner_label: String,
    pub display_name: String,
    pub created_at: i64,
    pub date: String,
    pub time: String,
}

impl GqlRecord {
    fn from_record(r: AttendanceRecord, format: &DisplayFormat) -> Self {
        Self {
            date: r.date.unwrap_or_else(|| format.date(r.created_at)),
            time: r.time.unwrap_or_else(|| format.time(r.created_at)),
            id: ID(r.id),
            owner_id: r.owner_id,
            owner_label: r.owner_label,
            display_name: r.display_name,
            created_at: r.created_at,
        }
    }
}

#[derive(Default)]
pub struct AttendanceQuery;

#[Object]
impl AttendanceQuery {
    /// Records visible to the caller, newest first.
    async fn records(&self, context: &Context<'_>) -> GqlResult<Vec<GqlRecord>> {
        let session = require_session(context).await?;
        let state = context.data_unchecked::<AppState>();
        let records = state
            .context
            .store
            .list_records(state.context.scope.owner_filter(&session.user_id))
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        let format = &state.context.renderer.format;
        Ok(records
            .into_iter()
            .map(|r| GqlRecord::from_record(r, format))
            .collect())
    }
}

#[derive(Default)]
pub struct AttendanceMutation;

#[Object]
impl AttendanceMutation {
    async fn add_record(&self, context: &Context<'_>, name: String) -> GqlResult<GqlRecord> {
        let session = require_session(context).await?;
        let state = context.data_unchecked::<AppState>();
        let record = state
            .context
            .store
            .add_record(&session.owner(), &name)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(GqlRecord::from_record(record, &state.context.renderer.format))
    }

    async fn delete_record(&self, context: &Context<'_>, id: ID) -> GqlResult<bool> {
        let session = require_session(context).await?;
        let state = context.data_unchecked::<AppState>();
        state
            .context
            .store
            .delete_record(
                &id,
                &session.user_id,
                state.context.scope.owner_filter(&session.user_id),
            )
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(true)
    }

    /// Returns the number of records removed.
    async fn clear_records(&self, context: &Context<'_>) -> GqlResult<u64> {
        let session = require_session(context).await?;
        let state = context.data_unchecked::<AppState>();
        let removed = state
            .context
            .store
            .clear_records(
                &session.user_id,
                state.context.scope.owner_filter(&session.user_id),
            )
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(removed as u64)
    }
}

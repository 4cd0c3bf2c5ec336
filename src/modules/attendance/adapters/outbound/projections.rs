// Repository trait for projection persistence.

use crate::modules::attendance::use_cases::list_attendance::projection::AttendanceRow;
use async_trait::async_trait;

#[async_trait]
pub trait AttendanceProjectionRepository: Send + Sync {
    async fn upsert(&self, row: AttendanceRow) -> anyhow::Result<()>;
    async fn remove(&self, record_id: &str) -> anyhow::Result<()>;
}

use crate::modules::attendance::core::record::AttendanceRecord;
use async_trait::async_trait;
use tokio::sync::watch;

#[async_trait]
pub trait AttendanceQueries {
    /// Live records, newest first. `owner_id` of `None` lists every owner.
    async fn list(&self, owner_id: Option<&str>) -> anyhow::Result<Vec<AttendanceRecord>>;

    /// Revision counter bumped after every applied mutation.
    fn watch(&self) -> watch::Receiver<u64>;
}

// Local record store: one JSON array under a single key-value entry.
//
// Layout
// - Key `attendance_app_data` holds the records in insertion order.
// - Entries written by the first version of the form carry no id and no owner.
//   Ids are assigned on first read and written back. Owner-less entries stay
//   visible to every viewer since their author is unknown.
//
// Concurrency
// - Every read-modify-write runs under one lock so concurrent writers never
//   lose each other's records.

use crate::modules::attendance::adapters::outbound::record_store::{RecordStore, StoreError};
use crate::modules::attendance::core::record::{
    AttendanceRecord, RecordOwner, newest_first, normalize_display_name,
};
use crate::shared::core::primitives::{Clock, new_id};
use crate::shared::infrastructure::key_value::{KeyValueError, KeyValueStore};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::info;

pub const RECORDS_KEY: &str = "attendance_app_data";

impl From<KeyValueError> for StoreError {
    fn from(error: KeyValueError) -> Self {
        StoreError::Unavailable(error.to_string())
    }
}

fn visible_to(record: &AttendanceRecord, owner_id: Option<&str>) -> bool {
    owner_id.is_none_or(|owner| record.owner_id.is_empty() || record.owner_id == owner)
}

pub struct LocalRecordStore<TKv>
where
    TKv: KeyValueStore + 'static,
{
    kv: Arc<TKv>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl<TKv> LocalRecordStore<TKv>
where
    TKv: KeyValueStore + 'static,
{
    pub fn new(kv: Arc<TKv>, clock: Arc<dyn Clock>) -> Self {
        Self {
            kv,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    async fn read(&self) -> Result<(Vec<AttendanceRecord>, bool), StoreError> {
        let Some(raw) = self.kv.get(RECORDS_KEY).await? else {
            return Ok((Vec::new(), false));
        };
        let mut records: Vec<AttendanceRecord> = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Unavailable(format!("unreadable records: {e}")))?;
        let mut upgraded = false;
        for record in records.iter_mut().filter(|r| r.id.is_empty()) {
            record.id = new_id();
            upgraded = true;
        }
        Ok((records, upgraded))
    }

    async fn write(&self, records: &[AttendanceRecord]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(records)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        self.kv.set(RECORDS_KEY, raw).await?;
        Ok(())
    }

    /// Load under the write lock, persisting ids assigned to legacy entries.
    async fn load_locked(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        let (records, upgraded) = self.read().await?;
        if upgraded {
            info!(count = records.len(), "assigned ids to legacy attendance records");
            self.write(&records).await?;
        }
        Ok(records)
    }
}

#[async_trait::async_trait]
impl<TKv> RecordStore for LocalRecordStore<TKv>
where
    TKv: KeyValueStore + 'static,
{
    async fn list_records(
        &self,
        owner_id: Option<&str>,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let records = self
            .load_locked()
            .await?
            .into_iter()
            .filter(|r| visible_to(r, owner_id))
            .collect();
        Ok(newest_first(records))
    }

    async fn add_record(
        &self,
        owner: &RecordOwner,
        display_name: &str,
    ) -> Result<AttendanceRecord, StoreError> {
        let display_name = normalize_display_name(display_name)?;
        let _guard = self.write_lock.lock().await;
        let mut records = self.load_locked().await?;
        let record = AttendanceRecord {
            id: new_id(),
            owner_id: owner.id.clone(),
            owner_label: owner.label.clone(),
            display_name,
            created_at: self.clock.now_millis(),
            date: None,
            time: None,
        };
        records.push(record.clone());
        self.write(&records).await?;
        info!(record_id = %record.id, owner_id = %record.owner_id, "attendance recorded locally");
        Ok(record)
    }

    async fn delete_record(
        &self,
        id: &str,
        requested_by: &str,
        owner_id: Option<&str>,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load_locked().await?;
        let Some(position) = records
            .iter()
            .position(|r| r.id == id && visible_to(r, owner_id))
        else {
            return Err(StoreError::NotFound { id: id.to_string() });
        };
        records.remove(position);
        self.write(&records).await?;
        info!(record_id = %id, requested_by, "local attendance record deleted");
        Ok(())
    }

    async fn clear_records(
        &self,
        requested_by: &str,
        owner_id: Option<&str>,
    ) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;
        let records = self.load_locked().await?;
        let before = records.len();
        let kept: Vec<AttendanceRecord> = records
            .into_iter()
            .filter(|r| !visible_to(r, owner_id))
            .collect();
        let removed = before - kept.len();
        if kept.is_empty() {
            self.kv.remove(RECORDS_KEY).await?;
        } else if removed > 0 {
            self.write(&kept).await?;
        }
        info!(removed, requested_by, "local attendance records cleared");
        Ok(removed)
    }

    fn changes(&self) -> Option<watch::Receiver<u64>> {
        None
    }
}

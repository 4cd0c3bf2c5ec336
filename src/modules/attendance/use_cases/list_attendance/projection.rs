use crate::modules::attendance::core::record::AttendanceRecord;

/// Read model row. `sequence` is assigned by the projection store on first
/// insert and breaks ties between records created in the same millisecond.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AttendanceRow {
    pub record_id: String,
    pub owner_id: String,
    pub owner_label: String,
    pub display_name: String,
    pub created_at: i64,
    pub sequence: u64,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        Self {
            id: row.record_id,
            owner_id: row.owner_id,
            owner_label: row.owner_label,
            display_name: row.display_name,
            created_at: row.created_at,
            date: None,
            time: None,
        }
    }
}

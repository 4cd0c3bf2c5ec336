// Event payload: AttendanceDeletedV1.
//
// Purpose
// - Record that an attendance record was removed and by whom.

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct AttendanceDeletedV1 {
    pub record_id: String,
    pub deleted_at: i64,
    pub deleted_by: String,
}

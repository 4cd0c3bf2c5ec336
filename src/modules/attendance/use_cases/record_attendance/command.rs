#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordAttendance {
    pub record_id: String,
    pub owner_id: String,
    pub owner_label: String,
    pub display_name: String,
    pub created_at: i64,
}

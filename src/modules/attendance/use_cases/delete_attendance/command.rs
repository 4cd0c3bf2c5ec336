/// Remove a record. `owner_filter` restricts the deletion to records owned by
/// that viewer; `None` allows removing any record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAttendance {
    pub record_id: String,
    pub requested_by: String,
    pub owner_filter: Option<String>,
    pub deleted_at: i64,
}

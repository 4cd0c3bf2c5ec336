// AttendanceState is the folded state of a single record stream.
//
// Lifecycle
// - None: nothing recorded yet.
// - Recorded: live record.
// - Deleted: tombstone; the id can not be reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceState {
    None,
    Recorded {
        record_id: String,
        owner_id: String,
        display_name: String,
        created_at: i64,
    },
    Deleted {
        record_id: String,
        owner_id: String,
        deleted_at: i64,
    },
}

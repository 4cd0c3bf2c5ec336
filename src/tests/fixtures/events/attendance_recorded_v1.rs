// Shared test fixture for AttendanceRecordedV1.

use crate::modules::attendance::core::events::v1::attendance_recorded::AttendanceRecordedV1;
use crate::tests::fixtures::commands::record_attendance::RecordAttendanceBuilder;

/// Canonical event instance for tests.
pub fn make_attendance_recorded_v1_event() -> AttendanceRecordedV1 {
    let command = RecordAttendanceBuilder::new().build();
    AttendanceRecordedV1 {
        record_id: command.record_id,
        owner_id: command.owner_id,
        owner_label: command.owner_label,
        display_name: command.display_name,
        created_at: command.created_at,
    }
}

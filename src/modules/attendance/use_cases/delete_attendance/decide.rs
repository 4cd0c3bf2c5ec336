use crate::modules::attendance::core::{
    decision::{DecideError, Decision},
    events::{AttendanceEvent, v1::attendance_deleted::AttendanceDeletedV1},
    state::AttendanceState,
};
use crate::modules::attendance::use_cases::delete_attendance::command::DeleteAttendance;

pub fn decide_delete(state: &AttendanceState, command: DeleteAttendance) -> Decision {
    match state {
        AttendanceState::Recorded {
            record_id,
            owner_id,
            ..
        } => {
            // Someone else's record is reported as absent rather than forbidden.
            if command
                .owner_filter
                .as_deref()
                .is_some_and(|owner| owner != owner_id)
            {
                return Decision::Rejected {
                    reason: DecideError::NotFound,
                };
            }
            Decision::Accepted {
                events: vec![AttendanceEvent::AttendanceDeletedV1(AttendanceDeletedV1 {
                    record_id: record_id.clone(),
                    deleted_at: command.deleted_at,
                    deleted_by: command.requested_by,
                })],
            }
        }
        AttendanceState::None | AttendanceState::Deleted { .. } => Decision::Rejected {
            reason: DecideError::NotFound,
        },
    }
}

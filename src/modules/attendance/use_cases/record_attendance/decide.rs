use crate::modules::attendance::core::{
    decision::{DecideError, Decision},
    events::{AttendanceEvent, v1::attendance_recorded::AttendanceRecordedV1},
    record::normalize_display_name,
    state::AttendanceState,
};
use crate::modules::attendance::use_cases::record_attendance::command::RecordAttendance;

pub fn decide_record(state: &AttendanceState, command: RecordAttendance) -> Decision {
    match state {
        AttendanceState::None => {
            let display_name = match normalize_display_name(&command.display_name) {
                Ok(name) => name,
                Err(e) => {
                    return Decision::Rejected {
                        reason: DecideError::Invalid(e),
                    };
                }
            };
            let payload = AttendanceRecordedV1 {
                record_id: command.record_id,
                owner_id: command.owner_id,
                owner_label: command.owner_label,
                display_name,
                created_at: command.created_at,
            };
            Decision::Accepted {
                events: vec![AttendanceEvent::AttendanceRecordedV1(payload)],
            }
        }
        _ => Decision::Rejected {
            reason: DecideError::AlreadyExists,
        },
    }
}

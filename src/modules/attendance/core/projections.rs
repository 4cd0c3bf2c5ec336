use crate::modules::attendance::core::events::AttendanceEvent;
use crate::modules::attendance::use_cases::list_attendance::projection::AttendanceRow;

pub enum Mutation {
    Upsert(AttendanceRow),
    Remove { record_id: String },
}

pub fn apply(event: &AttendanceEvent) -> Vec<Mutation> {
    match event {
        AttendanceEvent::AttendanceRecordedV1(details) => vec![Mutation::Upsert(AttendanceRow {
            record_id: details.record_id.clone(),
            owner_id: details.owner_id.clone(),
            owner_label: details.owner_label.clone(),
            display_name: details.display_name.clone(),
            created_at: details.created_at,
            sequence: 0,
        })],
        AttendanceEvent::AttendanceDeletedV1(details) => vec![Mutation::Remove {
            record_id: details.record_id.clone(),
        }],
    }
}

use crate::modules::attendance::core::events::AttendanceEvent;
use crate::modules::attendance::core::state::AttendanceState;

pub fn evolve(state: AttendanceState, event: AttendanceEvent) -> AttendanceState {
    match (state, event) {
        (AttendanceState::None, AttendanceEvent::AttendanceRecordedV1(e)) => {
            AttendanceState::Recorded {
                record_id: e.record_id,
                owner_id: e.owner_id,
                display_name: e.display_name,
                created_at: e.created_at,
            }
        }
        (
            AttendanceState::Recorded {
                record_id,
                owner_id,
                ..
            },
            AttendanceEvent::AttendanceDeletedV1(e),
        ) if record_id == e.record_id => AttendanceState::Deleted {
            record_id,
            owner_id,
            deleted_at: e.deleted_at,
        },
        (state, _) => state,
    }
}

#[cfg(test)]
mod attendance_evolve_tests {
    use super::*;
    use crate::modules::attendance::core::events::v1::attendance_deleted::AttendanceDeletedV1;
    use crate::modules::attendance::core::events::v1::attendance_recorded::AttendanceRecordedV1;
    use crate::tests::fixtures::events::attendance_recorded_v1::make_attendance_recorded_v1_event;
    use rstest::{fixture, rstest};

    #[fixture]
    fn recorded_event() -> AttendanceRecordedV1 {
        make_attendance_recorded_v1_event()
    }

    fn deleted_event(record_id: &str) -> AttendanceEvent {
        AttendanceEvent::AttendanceDeletedV1(AttendanceDeletedV1 {
            record_id: record_id.to_string(),
            deleted_at: 1_700_000_100_000,
            deleted_by: "user-fixed-0001".to_string(),
        })
    }

    #[rstest]
    fn it_should_evolve_the_state_to_recorded(recorded_event: AttendanceRecordedV1) {
        let state = evolve(
            AttendanceState::None,
            AttendanceEvent::AttendanceRecordedV1(recorded_event.clone()),
        );
        assert_eq!(
            state,
            AttendanceState::Recorded {
                record_id: recorded_event.record_id,
                owner_id: recorded_event.owner_id,
                display_name: recorded_event.display_name,
                created_at: recorded_event.created_at,
            }
        );
    }

    #[rstest]
    fn it_should_evolve_a_recorded_state_to_deleted(recorded_event: AttendanceRecordedV1) {
        let recorded = evolve(
            AttendanceState::None,
            AttendanceEvent::AttendanceRecordedV1(recorded_event.clone()),
        );
        let deleted = evolve(recorded, deleted_event(&recorded_event.record_id));
        assert!(matches!(
            deleted,
            AttendanceState::Deleted {
                deleted_at: 1_700_000_100_000,
                ..
            }
        ));
    }

    #[rstest]
    fn it_should_not_change_on_duplicate_recorded_event(recorded_event: AttendanceRecordedV1) {
        let recorded = evolve(
            AttendanceState::None,
            AttendanceEvent::AttendanceRecordedV1(recorded_event.clone()),
        );
        let next = evolve(
            recorded.clone(),
            AttendanceEvent::AttendanceRecordedV1(recorded_event),
        );
        assert_eq!(next, recorded, "state should be unchanged by fallback arm");
    }

    #[rstest]
    fn it_should_ignore_a_deletion_of_nothing() {
        let next = evolve(AttendanceState::None, deleted_event("rec-fixed-0001"));
        assert_eq!(next, AttendanceState::None);
    }
}

// Event payload: AttendanceRecordedV1.
//
// Purpose
// - Record the fact that a viewer marked attendance for a name.
//
// Timestamps
// - created_at is assigned by the store when the command is handled (epoch milliseconds).

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct AttendanceRecordedV1 {
    pub record_id: String,
    pub owner_id: String,
    pub owner_label: String,
    pub display_name: String,
    pub created_at: i64,
}

#[cfg(test)]
mod attendance_recorded_event_tests {
    use super::*;
    use crate::tests::fixtures::events::attendance_recorded_v1::make_attendance_recorded_v1_event;
    use rstest::rstest;

    #[rstest]
    fn it_should_serialize_with_a_stable_shape() {
        let event = make_attendance_recorded_v1_event();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "record_id": "rec-fixed-0001",
                "owner_id": "user-fixed-0001",
                "owner_label": "alice@example.com",
                "display_name": "Alice",
                "created_at": 1_700_000_000_000i64,
            })
        );
        let back: AttendanceRecordedV1 = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}

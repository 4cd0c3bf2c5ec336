// Root event enumeration for an attendance record stream.
//
// Versioning
// - Prefer additive changes. Breaking changes get a new versioned payload and variant.

pub mod v1 {
    pub mod attendance_deleted;
    pub mod attendance_recorded;
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum AttendanceEvent {
    AttendanceRecordedV1(v1::attendance_recorded::AttendanceRecordedV1),
    AttendanceDeletedV1(v1::attendance_deleted::AttendanceDeletedV1),
}

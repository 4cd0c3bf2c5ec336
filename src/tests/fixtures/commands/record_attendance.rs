// Shared test fixture for the RecordAttendance command.

use crate::modules::attendance::use_cases::record_attendance::command::RecordAttendance;
use serde::Deserialize;

const RECORD_ATTENDANCE_JSON: &str = include_str!("json/record_attendance.json");

// JSON -> DTO (transport shape)
#[derive(Debug, Clone, Deserialize)]
pub struct RecordAttendanceDto {
    pub record_id: String,
    pub owner_id: String,
    pub owner_label: String,
    pub display_name: String,
}

pub struct RecordAttendanceBuilder {
    inner: RecordAttendance,
}

impl Default for RecordAttendanceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl RecordAttendanceBuilder {
    pub fn new() -> Self {
        let dto: RecordAttendanceDto = serde_json::from_str(RECORD_ATTENDANCE_JSON).unwrap();

        Self {
            inner: RecordAttendance {
                record_id: dto.record_id,
                owner_id: dto.owner_id,
                owner_label: dto.owner_label,
                display_name: dto.display_name,
                created_at: 1700000000000,
            },
        }
    }

    pub fn record_id(mut self, v: impl Into<String>) -> Self {
        self.inner.record_id = v.into();
        self
    }

    pub fn owner_id(mut self, v: impl Into<String>) -> Self {
        self.inner.owner_id = v.into();
        self
    }

    pub fn display_name(mut self, v: impl Into<String>) -> Self {
        self.inner.display_name = v.into();
        self
    }

    pub fn created_at(mut self, v: i64) -> Self {
        self.inner.created_at = v;
        self
    }

    pub fn build(self) -> RecordAttendance {
        self.inner
    }
}

#[cfg(test)]
mod record_attendance_builder_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_delegates_to_new_and_parses_json() {
        let built = RecordAttendanceBuilder::default().build();
        assert_eq!(built.record_id, "rec-fixed-0001");
        assert_eq!(built.owner_id, "user-fixed-0001");
        assert_eq!(built.owner_label, "alice@example.com");
        assert_eq!(built.display_name, "Alice");
        assert_eq!(built.created_at, 1_700_000_000_000i64);
    }

    #[rstest]
    fn setters_override_fields_and_build_returns_inner() {
        let custom = RecordAttendanceBuilder::new()
            .record_id("rec-123")
            .owner_id("user-456")
            .display_name("Bob")
            .created_at(3333)
            .build();

        assert_eq!(custom.record_id, "rec-123");
        assert_eq!(custom.owner_id, "user-456");
        assert_eq!(custom.display_name, "Bob");
        assert_eq!(custom.created_at, 3333);
    }
}

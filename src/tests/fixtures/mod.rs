pub mod clock;
pub mod context;
pub mod stores;

pub mod commands {
    pub mod record_attendance;
}

pub mod events {
    pub mod attendance_recorded_v1;
    pub mod domain_event;
}

use crate::modules::attendance::core::events::AttendanceEvent;
use crate::modules::attendance::core::record::ValidationError;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("attendance record already exists")]
    AlreadyExists,

    #[error("attendance record not found")]
    NotFound,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

pub enum Decision {
    Accepted { events: Vec<AttendanceEvent> },
    Rejected { reason: DecideError },
}

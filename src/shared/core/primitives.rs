// Small building blocks shared by every module.
//
// Purpose
// - Give the stores a single source of "now" so timestamps can be pinned in tests.
// - Generate record and session identifiers in one place.
//
// Notes
// - All instants are epoch milliseconds (i64), matching the event payloads.

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Time ordered identifier (UUID v7) used for records and sessions.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

// AttendanceRecord is the shape every backend hands out and the renderer consumes.
//
// Notes
// - created_at is epoch milliseconds assigned by the store that accepted the record.
// - date/time are optional display strings cached by older clients. When present
//   they win over values derived from created_at.
// - Serialized in camelCase; `name` and `timestamp` are accepted for data written
//   by the first local-storage version of the form.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub owner_label: String,
    #[serde(alias = "name")]
    pub display_name: String,
    #[serde(alias = "timestamp")]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// The viewer a new record is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOwner {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
}

/// Trim a submitted name; whitespace-only input is rejected.
pub fn normalize_display_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Which records a viewer sees and may remove.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordScope {
    #[default]
    PerOwner,
    Shared,
}

impl RecordScope {
    pub fn owner_filter<'a>(&self, viewer_id: &'a str) -> Option<&'a str> {
        match self {
            RecordScope::PerOwner => Some(viewer_id),
            RecordScope::Shared => None,
        }
    }
}

impl std::str::FromStr for RecordScope {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "per-owner" | "per_owner" | "owner" => Ok(RecordScope::PerOwner),
            "shared" | "all" => Ok(RecordScope::Shared),
            other => Err(format!("unknown record scope '{other}'")),
        }
    }
}

/// Order records stored in insertion order newest first.
/// Equal timestamps keep the later insertion on top.
pub fn newest_first(mut records: Vec<AttendanceRecord>) -> Vec<AttendanceRecord> {
    records.reverse();
    records.sort_by_key(|r| Reverse(r.created_at));
    records
}

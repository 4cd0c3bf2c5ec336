// Runtime configuration read from the environment (and a `.env` file in main).
//
// Every key has a default that is logged when used. Malformed values are an
// error rather than a silent fallback.

use crate::modules::attendance::core::record::RecordScope;
use chrono::FixedOffset;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Synchronized,
    Local,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "synchronized" | "remote" => Ok(BackendKind::Synchronized),
            "local" => Ok(BackendKind::Local),
            other => Err(format!("unknown backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub backend: BackendKind,
    pub data_file: PathBuf,
    pub scope: RecordScope,
    pub accounts: Vec<Account>,
    pub date_format: String,
    pub time_format: String,
    pub utc_offset: FixedOffset,
    pub poll_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let offset_minutes: i32 = try_load(&lookup, "ATTENDANCE_UTC_OFFSET_MINUTES", "0")?;
        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::Invalid {
                key: "ATTENDANCE_UTC_OFFSET_MINUTES",
                value: offset_minutes.to_string(),
                reason: "offset out of range".into(),
            })?;
        let poll_secs: u64 = try_load(&lookup, "ATTENDANCE_POLL_TIMEOUT_SECS", "25")?;

        Ok(Self {
            bind_addr: try_load(&lookup, "ATTENDANCE_BIND_ADDR", "0.0.0.0:8080")?,
            backend: try_load(&lookup, "ATTENDANCE_BACKEND", "synchronized")?,
            data_file: try_load(&lookup, "ATTENDANCE_DATA_FILE", "attendance.json")?,
            scope: try_load(&lookup, "ATTENDANCE_SCOPE", "per-owner")?,
            accounts: parse_accounts(&load(&lookup, "ATTENDANCE_ACCOUNTS", ""))?,
            date_format: load(&lookup, "ATTENDANCE_DATE_FORMAT", "%d/%m/%Y"),
            time_format: load(&lookup, "ATTENDANCE_TIME_FORMAT", "%H:%M:%S"),
            utc_offset,
            poll_timeout: Duration::from_secs(poll_secs),
        })
    }
}

fn load(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = load(lookup, key, default);
    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }
    })
}

/// `email:password` pairs separated by commas. Blank entries are skipped.
fn parse_accounts(raw: &str) -> Result<Vec<Account>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((email, password)) if !email.trim().is_empty() => Ok(Account {
                email: email.trim().to_string(),
                password: password.to_string(),
            }),
            _ => Err(ConfigError::Invalid {
                key: "ATTENDANCE_ACCOUNTS",
                value: entry.to_string(),
                reason: "expected email:password".into(),
            }),
        })
        .collect()
}

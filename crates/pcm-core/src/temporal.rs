//! # Temporal Types
//!
//! `Timestamp` is a UTC-only instant truncated to seconds, used for the
//! court-proceedings-initiated time on defendant records. Calendar dates
//! (dates of birth, order validity dates) are plain `chrono::NaiveDate`
//! rendered with [`ISO_DATE_FORMAT`].

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PcmError;

/// `yyyy-MM-dd`.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Render a calendar date as `yyyy-MM-dd`.
pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// A UTC-only timestamp, truncated to seconds precision.
///
/// Constructed with [`Timestamp::parse()`], which only accepts the `Z`
/// suffix. Deserialization goes through the same validation, so records
/// carrying an explicit offset are rejected at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parse a timestamp from an RFC 3339 string, truncating sub-seconds.
    ///
    /// Only the `Z` suffix is accepted; explicit offsets, including `+00:00`,
    /// are rejected.
    pub fn parse(s: &str) -> Result<Self, PcmError> {
        if !s.ends_with('Z') {
            return Err(PcmError::SchemaValidation(format!(
                "Timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            PcmError::SchemaValidation(format!("Invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

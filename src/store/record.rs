//! # Hourly Records
//!
//! One [`HourlyRecord`] is written per closed hour window. On disk it is a
//! single flat JSON object: every event key maps to its count, plus a `time`
//! field holding the window start as `DD.MM.YYYY HH:MM:SS`.
//!
//! ```json
//! {"BTN_LEFT": 412, "BTN_RIGHT": 37, "time": "05.02.2025 14:00:12"}
//! ```
//!
//! The mapping is sparse: a key that never fired is simply missing.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Timestamp format used for the `time` field
pub const TIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Name of the timestamp field inside a record line
pub const TIME_FIELD: &str = "time";

/// Counts for one hour window, keyed by event name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord", into = "RawRecord")]
pub struct HourlyRecord {
    /// Start of the hour window this record closes
    pub time: NaiveDateTime,
    /// Map of event key -> number of activations
    pub counts: BTreeMap<String, u64>,
}

/// Wire shape of a record line
#[derive(Serialize, Deserialize)]
struct RawRecord {
    #[serde(flatten)]
    counts: BTreeMap<String, u64>,
    time: String,
}

impl TryFrom<RawRecord> for HourlyRecord {
    type Error = chrono::ParseError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            time: NaiveDateTime::parse_from_str(&raw.time, TIME_FORMAT)?,
            counts: raw.counts,
        })
    }
}

impl From<HourlyRecord> for RawRecord {
    fn from(record: HourlyRecord) -> Self {
        Self {
            counts: record.counts,
            time: record.time.format(TIME_FORMAT).to_string(),
        }
    }
}

impl HourlyRecord {
    pub fn new(time: NaiveDateTime, counts: BTreeMap<String, u64>) -> Self {
        Self { time, counts }
    }

    /// Count for `key`, treating a missing key as zero
    pub fn count(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Index of this record's hour within its month: `day * 24 - 24 + hour`
    pub fn hour_of_month(&self) -> u32 {
        hour_of_month(&self.time)
    }

    /// Serialize to a single line (without the trailing newline)
    pub fn to_line(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize hourly record")
    }

    /// Parse a single record line
    pub fn from_line(line: &str) -> Result<Self> {
        serde_json::from_str(line).context("Malformed hourly record")
    }
}

/// Hour-of-month index used to key records within a month file
pub fn hour_of_month(time: &NaiveDateTime) -> u32 {
    time.day() * 24 - 24 + time.hour()
}

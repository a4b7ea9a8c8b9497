//! # Month Files
//!
//! Records are appended to one file per calendar month:
//!
//! ```text
//! ~/.local/share/mousestats/
//! ├── data_2025_01.jsonl
//! ├── data_2025_02.jsonl
//! └── ...
//! ```
//!
//! The file a record lands in is chosen from the record's own timestamp, so a
//! window that started on the last hour of a month is written to that month
//! even if it is closed after midnight.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDateTime};
use log::info;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::counter::CheckpointSink;
use crate::store::record::HourlyRecord;

/// File name for the given month, e.g. `data_2025_02.jsonl`
pub fn month_file_name(year: i32, month: u32) -> String {
    format!("data_{:04}_{:02}.jsonl", year, month)
}

/// Append-only writer for month files under a base directory
#[derive(Debug, Clone)]
pub struct MonthLog {
    base_dir: PathBuf,
}

impl MonthLog {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the month file a record with this timestamp belongs to
    pub fn path_for(&self, time: &NaiveDateTime) -> PathBuf {
        self.base_dir
            .join(month_file_name(time.year(), time.month()))
    }

    /// Append one record as a single line, creating the directory if needed
    pub fn append(&self, record: &HourlyRecord) -> Result<PathBuf> {
        let path = self.path_for(&record.time);
        let line = record.to_line()?;

        fs::create_dir_all(&self.base_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                self.base_dir.display()
            )
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open data file: {}", path.display()))?;

        // Single write call so the line lands whole
        file.write_all(format!("{}\n", line).as_bytes())
            .with_context(|| format!("Failed to write data file: {}", path.display()))?;
        file.flush()
            .with_context(|| format!("Failed to flush data file: {}", path.display()))?;

        info!("Saved! data='{}'", line);
        Ok(path)
    }
}

impl CheckpointSink for MonthLog {
    fn write(&mut self, record: &HourlyRecord) -> Result<()> {
        self.append(record).map(|_| ())
    }
}

/// Everything loaded from one month file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthData {
    /// Every line of the file, in file order
    pub records: Vec<HourlyRecord>,
    /// Records keyed by hour of month; a later line replaces an earlier one
    pub by_hour: BTreeMap<u32, HourlyRecord>,
}

impl MonthData {
    pub fn from_records(records: Vec<HourlyRecord>) -> Self {
        let by_hour = records
            .iter()
            .map(|r| (r.hour_of_month(), r.clone()))
            .collect();
        Self { records, by_hour }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct hours covered by this file
    pub fn active_hours(&self) -> usize {
        self.by_hour.len()
    }
}

/// Read and parse every line of a month file
///
/// Any malformed line fails the whole file; the error names the file and line.
pub fn read_month_file(path: &Path) -> Result<MonthData> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))?;

    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = HourlyRecord::from_line(line)
            .with_context(|| format!("Failed to parse {} line {}", path.display(), idx + 1))?;
        records.push(record);
    }

    Ok(MonthData::from_records(records))
}

/// Load one month; a month without a file is simply empty
pub fn load_month(base_dir: &Path, year: i32, month: u32) -> Result<MonthData> {
    let path = base_dir.join(month_file_name(year, month));
    if !path.exists() {
        return Ok(MonthData::default());
    }
    read_month_file(&path)
}

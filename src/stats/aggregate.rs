//! Roll hourly records up into month, year and lifetime sums.
//!
//! Sums are field-wise over every count-bearing key, including keys this
//! crate has never heard of. Each summed record also contributes one
//! [`HOUR_KEY`] so active hours come out of the same machinery as clicks.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

use crate::store::{find_month_files, read_month_file, HourlyRecord, MonthData};

/// Bookkeeping key counting one per summed record
pub const HOUR_KEY: &str = "_hour";

/// Field-wise sums keyed by event name; a missing key is zero
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary(BTreeMap<String, u64>);

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn add(&mut self, key: &str, value: u64) {
        *self.0.entry(key.to_string()).or_insert(0) += value;
    }

    /// Add every count of `record` plus one active hour
    pub fn add_record(&mut self, record: &HourlyRecord) {
        for (key, value) in &record.counts {
            self.add(key, *value);
        }
        self.add(HOUR_KEY, 1);
    }

    /// Add another summary into this one
    pub fn merge(&mut self, other: &Summary) {
        for (key, value) in &other.0 {
            self.add(key, *value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a HourlyRecord> for Summary {
    fn from_iter<I: IntoIterator<Item = &'a HourlyRecord>>(iter: I) -> Self {
        let mut summary = Summary::new();
        for record in iter {
            summary.add_record(record);
        }
        summary
    }
}

impl<'a> FromIterator<&'a Summary> for Summary {
    fn from_iter<I: IntoIterator<Item = &'a Summary>>(iter: I) -> Self {
        let mut summary = Summary::new();
        for other in iter {
            summary.merge(other);
        }
        summary
    }
}

/// Sum a set of records
pub fn sum_records<'a>(records: impl IntoIterator<Item = &'a HourlyRecord>) -> Summary {
    records.into_iter().collect()
}

/// Month, year and lifetime roll-ups over a set of month files
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    pub months: BTreeMap<(i32, u32), Summary>,
    pub years: BTreeMap<i32, Summary>,
    pub total: Summary,
    /// One record per distinct hour, across all months
    pub flattened: Vec<HourlyRecord>,
    /// Number of distinct logged hours across all months
    pub active_hours: u64,
}

impl Aggregate {
    pub fn from_months(months: Vec<((i32, u32), MonthData)>) -> Self {
        let mut aggregate = Self::default();

        for ((year, month), data) in months {
            let summary = sum_records(&data.records);

            aggregate
                .years
                .entry(year)
                .or_default()
                .merge(&summary);
            aggregate.total.merge(&summary);
            aggregate
                .months
                .entry((year, month))
                .or_default()
                .merge(&summary);

            aggregate.active_hours += data.active_hours() as u64;
            aggregate.flattened.extend(data.by_hour.into_values());
        }

        aggregate
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Find, read and aggregate every month file under `base_dir`
pub fn load_all(base_dir: &Path) -> Result<Aggregate> {
    let mut months = Vec::new();
    for file in find_month_files(base_dir)? {
        let data = read_month_file(&file.path)
            .with_context(|| format!("Failed to load month {}-{:02}", file.year, file.month))?;
        months.push(((file.year, file.month), data));
    }
    Ok(Aggregate::from_months(months))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn record(time: NaiveDateTime, pairs: &[(&str, u64)]) -> HourlyRecord {
        HourlyRecord::new(
            time,
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        )
    }

    fn month_a() -> MonthData {
        MonthData::from_records(vec![
            record(at(2024, 12, 1, 9), &[("BTN_LEFT", 10), ("BTN_RIGHT", 1)]),
            record(at(2024, 12, 1, 10), &[("BTN_LEFT", 5), ("BTN_SIDE", 2)]),
        ])
    }

    fn month_b() -> MonthData {
        MonthData::from_records(vec![
            record(at(2025, 1, 3, 14), &[("BTN_LEFT", 7)]),
            record(at(2025, 1, 4, 8), &[("BTN_LEFT", 0)]),
        ])
    }

    fn month_c() -> MonthData {
        MonthData::from_records(vec![record(at(2025, 2, 1, 0), &[("BTN_MIDDLE", 3)])])
    }

    #[test]
    fn test_sum_records_keeps_unknown_keys() {
        let summary = sum_records(&month_a().records);
        assert_eq!(summary.get("BTN_LEFT"), 15);
        assert_eq!(summary.get("BTN_RIGHT"), 1);
        assert_eq!(summary.get("BTN_SIDE"), 2);
        assert_eq!(summary.get("BTN_MIDDLE"), 0);
        assert_eq!(summary.get(HOUR_KEY), 2);
    }

    #[test]
    fn test_merge_is_commutative() {
        let a = sum_records(&month_a().records);
        let b = sum_records(&month_b().records);

        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_month_sums_combine_to_record_sum() {
        let all: Vec<HourlyRecord> = [month_a(), month_b(), month_c()]
            .into_iter()
            .flat_map(|m| m.records)
            .collect();
        let direct = sum_records(&all);

        let aggregate = Aggregate::from_months(vec![
            ((2024, 12), month_a()),
            ((2025, 1), month_b()),
            ((2025, 2), month_c()),
        ]);
        let via_months: Summary = aggregate.months.values().collect();
        let via_years: Summary = aggregate.years.values().collect();

        assert_eq!(aggregate.total, direct);
        assert_eq!(via_months, direct);
        assert_eq!(via_years, direct);
    }

    #[test]
    fn test_file_order_does_not_matter() {
        let forward = Aggregate::from_months(vec![((2024, 12), month_a()), ((2025, 1), month_b())]);
        let reverse = Aggregate::from_months(vec![((2025, 1), month_b()), ((2024, 12), month_a())]);
        assert_eq!(forward.total, reverse.total);
        assert_eq!(forward.years, reverse.years);
        assert_eq!(forward.months, reverse.months);
    }

    #[test]
    fn test_years_group_months() {
        let aggregate = Aggregate::from_months(vec![
            ((2024, 12), month_a()),
            ((2025, 1), month_b()),
            ((2025, 2), month_c()),
        ]);

        assert_eq!(aggregate.years.len(), 2);
        assert_eq!(aggregate.years[&2024].get("BTN_LEFT"), 15);
        assert_eq!(aggregate.years[&2025].get("BTN_LEFT"), 7);
        assert_eq!(aggregate.years[&2025].get("BTN_MIDDLE"), 3);
        assert_eq!(aggregate.years[&2025].get(HOUR_KEY), 3);
        assert_eq!(aggregate.active_hours, 5);
        assert_eq!(aggregate.flattened.len(), 5);
    }

    #[test]
    fn test_duplicate_hours_sum_every_line_but_count_once() {
        let data = MonthData::from_records(vec![
            record(at(2025, 3, 2, 7), &[("BTN_LEFT", 4)]),
            record(at(2025, 3, 2, 7), &[("BTN_LEFT", 6)]),
        ]);
        let aggregate = Aggregate::from_months(vec![((2025, 3), data)]);

        assert_eq!(aggregate.total.get("BTN_LEFT"), 10);
        assert_eq!(aggregate.total.get(HOUR_KEY), 2);
        assert_eq!(aggregate.active_hours, 1);
        assert_eq!(aggregate.flattened.len(), 1);
        assert_eq!(aggregate.flattened[0].count("BTN_LEFT"), 6);
    }

    #[test]
    fn test_empty_month_contributes_nothing() {
        let aggregate = Aggregate::from_months(vec![((2025, 4), MonthData::default())]);
        assert!(aggregate.months[&(2025, 4)].is_empty());
        assert!(aggregate.total.is_empty());
        assert_eq!(aggregate.active_hours, 0);
    }
}

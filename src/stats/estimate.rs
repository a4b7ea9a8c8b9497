//! Usage-rate and wear-out estimates.
//!
//! Two views of the same data: one counts only logged hours, the other
//! spreads the clicks over all wall-clock time since the first record.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::stats::aggregate::Summary;
use crate::store::HourlyRecord;

/// Assumed number of presses a mouse switch survives
pub const DEFAULT_RATED_LIFE: u64 = 20_000_000;

const HOURS_PER_YEAR: f64 = 24.0 * 365.0;

/// Reasons an estimate cannot be computed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    #[error("no active hours have been logged yet")]
    NoActiveHours,
    #[error("no '{key}' presses have been logged yet")]
    NoPrimaryActivations { key: String },
    #[error("no records to date the first observation")]
    NoRecords,
    #[error("first record at {first} is not before now ({now})")]
    EmptyLifetime {
        first: NaiveDateTime,
        now: NaiveDateTime,
    },
}

/// Presses per hour
pub fn clicks_per_hour(count: u64, hours: f64) -> Result<f64, EstimateError> {
    if hours <= 0.0 {
        return Err(EstimateError::NoActiveHours);
    }
    Ok(count as f64 / hours)
}

/// Hours until `rated_life` presses at `cph` presses per hour
pub fn projected_hours(rated_life: u64, cph: f64, key: &str) -> Result<f64, EstimateError> {
    if cph <= 0.0 {
        return Err(EstimateError::NoPrimaryActivations {
            key: key.to_string(),
        });
    }
    Ok(rated_life as f64 / cph)
}

/// Share of wall-clock hours that were logged, in percent
pub fn active_percentage(active_hours: f64, wall_hours: f64) -> Result<f64, EstimateError> {
    if wall_hours <= 0.0 {
        return Err(EstimateError::NoActiveHours);
    }
    Ok(active_hours / wall_hours * 100.0)
}

pub fn hours_to_years(hours: f64) -> f64 {
    hours / HOURS_PER_YEAR
}

/// Rough life expectancy figures for the primary button
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub primary_key: String,
    pub rated_life: u64,
    pub primary_count: u64,
    pub active_hours: u64,
    /// Presses per logged hour
    pub cph: f64,
    pub projected_hours: f64,
    pub first_record: NaiveDateTime,
    pub wall_hours: f64,
    pub active_percentage: f64,
    /// Presses per wall-clock hour
    pub wall_cph: f64,
    pub wall_projected_hours: f64,
}

impl Estimate {
    pub fn compute(
        total: &Summary,
        active_hours: u64,
        flattened: &[HourlyRecord],
        now: NaiveDateTime,
        primary_key: &str,
        rated_life: u64,
    ) -> Result<Self, EstimateError> {
        let primary_count = total.get(primary_key);

        let cph = clicks_per_hour(primary_count, active_hours as f64)?;
        let projected = projected_hours(rated_life, cph, primary_key)?;

        let first_record = flattened
            .iter()
            .map(|r| r.time)
            .min()
            .ok_or(EstimateError::NoRecords)?;
        let wall_hours = (now - first_record).num_seconds() as f64 / 3600.0;
        if wall_hours <= 0.0 {
            return Err(EstimateError::EmptyLifetime {
                first: first_record,
                now,
            });
        }

        let wall_cph = clicks_per_hour(primary_count, wall_hours)?;
        let wall_projected = projected_hours(rated_life, wall_cph, primary_key)?;

        Ok(Self {
            primary_key: primary_key.to_string(),
            rated_life,
            primary_count,
            active_hours,
            cph,
            projected_hours: projected,
            first_record,
            wall_hours,
            active_percentage: active_percentage(active_hours as f64, wall_hours)?,
            wall_cph,
            wall_projected_hours: wall_projected,
        })
    }

    pub fn projected_years(&self) -> f64 {
        hours_to_years(self.projected_hours)
    }

    pub fn wall_years(&self) -> f64 {
        hours_to_years(self.wall_hours)
    }

    pub fn wall_projected_years(&self) -> f64 {
        hours_to_years(self.wall_projected_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use std::collections::BTreeMap;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn records(hours: u64) -> Vec<HourlyRecord> {
        (0..hours)
            .map(|h| HourlyRecord::new(start() + Duration::hours(h as i64), BTreeMap::new()))
            .collect()
    }

    fn total(left: u64) -> Summary {
        let mut summary = Summary::new();
        summary.add("BTN_LEFT", left);
        summary
    }

    #[test]
    fn test_clicks_per_hour_and_projection() {
        let cph = clicks_per_hour(100, 50.0).unwrap();
        assert_eq!(cph, 2.0);
        assert_eq!(projected_hours(20_000_000, cph, "BTN_LEFT").unwrap(), 10_000_000.0);
    }

    #[test]
    fn test_active_percentage() {
        assert_eq!(active_percentage(50.0, 200.0).unwrap(), 25.0);
    }

    #[test]
    fn test_zero_denominators_are_errors() {
        assert_eq!(clicks_per_hour(100, 0.0), Err(EstimateError::NoActiveHours));
        assert_eq!(active_percentage(5.0, 0.0), Err(EstimateError::NoActiveHours));
        assert!(matches!(
            projected_hours(20_000_000, 0.0, "BTN_LEFT"),
            Err(EstimateError::NoPrimaryActivations { .. })
        ));
    }

    #[test]
    fn test_compute_full_estimate() {
        let now = start() + Duration::hours(200);
        let estimate =
            Estimate::compute(&total(100), 50, &records(50), now, "BTN_LEFT", DEFAULT_RATED_LIFE)
                .unwrap();

        assert_eq!(estimate.cph, 2.0);
        assert_eq!(estimate.projected_hours, 10_000_000.0);
        assert_eq!(estimate.first_record, start());
        assert_eq!(estimate.wall_hours, 200.0);
        assert_eq!(estimate.active_percentage, 25.0);
        assert_eq!(estimate.wall_cph, 0.5);
        assert_eq!(estimate.wall_projected_hours, 40_000_000.0);
        assert!((estimate.projected_years() - 10_000_000.0 / 8760.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_without_active_hours() {
        let result = Estimate::compute(&total(0), 0, &[], start(), "BTN_LEFT", DEFAULT_RATED_LIFE);
        assert_eq!(result, Err(EstimateError::NoActiveHours));
    }

    #[test]
    fn test_compute_without_primary_presses() {
        let now = start() + Duration::hours(10);
        let result =
            Estimate::compute(&total(0), 3, &records(3), now, "BTN_LEFT", DEFAULT_RATED_LIFE);
        assert!(matches!(result, Err(EstimateError::NoPrimaryActivations { .. })));
    }

    #[test]
    fn test_compute_without_records() {
        let result =
            Estimate::compute(&total(10), 3, &[], start(), "BTN_LEFT", DEFAULT_RATED_LIFE);
        assert_eq!(result, Err(EstimateError::NoRecords));
    }

    #[test]
    fn test_compute_with_first_record_in_future() {
        let now = start() - Duration::hours(1);
        let result =
            Estimate::compute(&total(10), 1, &records(1), now, "BTN_LEFT", DEFAULT_RATED_LIFE);
        assert!(matches!(result, Err(EstimateError::EmptyLifetime { .. })));
    }
}

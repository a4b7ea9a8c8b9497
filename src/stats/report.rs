//! Plain-text summary report.

use chrono::NaiveDateTime;
use std::fmt::{self, Write};

use crate::stats::aggregate::{Aggregate, Summary, HOUR_KEY};
use crate::stats::estimate::{Estimate, EstimateError};

/// Keys always shown first, in this order, even when zero
pub const BUTTON_ORDER: &[&str] = &[
    "BTN_LEFT",
    "BTN_RIGHT",
    "BTN_MIDDLE",
    "REL_LEFT",
    "REL_RIGHT",
    HOUR_KEY,
];

/// Column width for counts
const NUM_DIGITS: usize = 7;

/// Human-readable label for an event key
pub fn button_name(key: &str) -> &'static str {
    match key {
        "BTN_LEFT" => "Left",
        "BTN_RIGHT" => "Right",
        "BTN_MIDDLE" => "Middle",
        "REL_WHEEL" => "Wheel",
        "REL_LEFT" => "Extra-Left",
        "REL_RIGHT" => "Extra-Right",
        HOUR_KEY => "Active hours",
        _ => "Other",
    }
}

/// One summary as tab-separated `Label: count` columns
pub fn format_line(summary: &Summary) -> String {
    let fixed = BUTTON_ORDER.iter().map(|key| (*key, summary.get(key)));
    let extra = summary
        .iter()
        .filter(|(key, _)| !BUTTON_ORDER.iter().any(|fixed| fixed == key));

    fixed
        .chain(extra)
        .map(|(key, value)| format!("{}: {:>width$}", button_name(key), value, width = NUM_DIGITS))
        .collect::<Vec<_>>()
        .join("\t")
}

/// Write monthly, yearly and total sums followed by the estimates
pub fn write_report(
    out: &mut impl Write,
    aggregate: &Aggregate,
    estimate: &Result<Estimate, EstimateError>,
) -> fmt::Result {
    writeln!(out, "\nMonthly sums:")?;
    for ((year, month), summary) in &aggregate.months {
        writeln!(out, "{}-{:02}: {}", year, month, format_line(summary))?;
    }

    writeln!(out, "\nYearly sums:")?;
    for (year, summary) in &aggregate.years {
        writeln!(out, "{}:    {}", year, format_line(summary))?;
    }

    writeln!(out, "\nTotal:")?;
    writeln!(out, "         {}", format_line(&aggregate.total))?;

    writeln!(out, "\nSome rough estimates:")?;
    match estimate {
        Ok(estimate) => write_estimate(out, estimate),
        Err(err) => writeln!(out, "Insufficient data for an estimate: {}", err),
    }
}

fn write_estimate(out: &mut impl Write, e: &Estimate) -> fmt::Result {
    writeln!(
        out,
        "{} {} clicks over roughly {}h => {:.2} clicks/hour",
        e.primary_count,
        button_name(&e.primary_key),
        e.active_hours,
        e.cph
    )?;
    writeln!(
        out,
        "Assuming a life expectancy of {} clicks, the button should last about {:.2}h (~{:.2}y) of normal usage",
        e.rated_life,
        e.projected_hours,
        e.projected_years()
    )?;
    writeln!(
        out,
        "First record is at {}, total lifetime is about {:.2}h (~{:.2}y, ~{:.2}% active)",
        format_time(&e.first_record),
        e.wall_hours,
        e.wall_years(),
        e.active_percentage
    )?;
    writeln!(
        out,
        "Using the total lifetime, expected total lifetime is about {:.2}h (~{:.2}y, {:.2} CPH)",
        e.wall_projected_hours,
        e.wall_projected_years(),
        e.wall_cph
    )
}

fn format_time(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Render the full report to a string
pub fn render_report(aggregate: &Aggregate, estimate: &Result<Estimate, EstimateError>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, aggregate, estimate);
    out
}

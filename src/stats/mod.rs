//! # Statistics Module
//!
//! Read-only analysis over the month files: roll the hourly records up into
//! month, year and lifetime sums, derive click rates and wear-out estimates,
//! and render the summary report.
//!
//! Running the analysis never touches the logs, so it can be repeated at any
//! time with identical output (apart from the "now"-relative estimates).

pub mod aggregate;
pub mod estimate;
pub mod report;

pub use aggregate::{load_all, sum_records, Aggregate, Summary, HOUR_KEY};
pub use estimate::{Estimate, EstimateError, DEFAULT_RATED_LIFE};
pub use report::{button_name, format_line, render_report, write_report, BUTTON_ORDER};

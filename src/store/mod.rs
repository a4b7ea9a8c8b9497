//! # Log Store
//!
//! Durable storage for hourly counts: one append-only JSON-lines file per
//! calendar month, plus the helpers to find and read those files back.
//!
//! ## Data Format
//!
//! Each line is one closed hour window:
//!
//! ```json
//! {"BTN_LEFT": 412, "BTN_RIGHT": 37, "time": "05.02.2025 14:00:12"}
//! ```

pub mod discovery;
pub mod month_log;
pub mod record;

pub use discovery::{expand_datapath, find_files, find_month_files, find_months, MonthFile};
pub use month_log::{load_month, month_file_name, read_month_file, MonthData, MonthLog};
pub use record::{hour_of_month, HourlyRecord, TIME_FIELD, TIME_FORMAT};

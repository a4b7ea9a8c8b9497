//! mousestats - count mouse button presses and estimate mouse wear
//!
//! This library provides the core functionality for counting input events per
//! hour, persisting them to monthly JSON-lines files, and rolling those files
//! up into usage summaries and life expectancy estimates.

pub mod config;
pub mod counter;
pub mod event;
pub mod runtime;
pub mod stats;
pub mod store;

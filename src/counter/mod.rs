//! # Counter
//!
//! The live accumulator for the current hour window and the checkpoint
//! decision that closes it.
//!
//! Every incoming event first checks whether the wall-clock date or hour has
//! moved on since the window started. If it has, the window is closed into an
//! [`HourlyRecord`] and a fresh one begins. Hours with no events at all never
//! produce a record: the next event closes the stale window once and the gap
//! stays a gap.

use anyhow::Result;
use chrono::{NaiveDateTime, Timelike};
use std::collections::BTreeMap;

use crate::event::InputEvent;
use crate::store::HourlyRecord;

/// Destination for closed hour windows
pub trait CheckpointSink {
    fn write(&mut self, record: &HourlyRecord) -> Result<()>;
}

/// Running counts for the current hour window
#[derive(Debug, Clone)]
pub struct Counter {
    primary_key: String,
    counts: BTreeMap<String, u64>,
    last_checkpoint: NaiveDateTime,
}

impl Counter {
    /// Start a window at `now`, seeded with the primary key at zero
    pub fn new(primary_key: &str, now: NaiveDateTime) -> Self {
        Self {
            primary_key: primary_key.to_string(),
            counts: seed(primary_key),
            last_checkpoint: now,
        }
    }

    pub fn counts(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    pub fn last_checkpoint(&self) -> NaiveDateTime {
        self.last_checkpoint
    }

    /// Whether `now` falls in a different date or hour than the open window
    pub fn window_elapsed(&self, now: NaiveDateTime) -> bool {
        now.date() != self.last_checkpoint.date() || now.hour() != self.last_checkpoint.hour()
    }

    /// Feed one event; returns the closed window if this event crossed an hour
    pub fn observe(&mut self, event: &InputEvent, now: NaiveDateTime) -> Option<HourlyRecord> {
        let closed = if self.window_elapsed(now) {
            Some(self.checkpoint(now))
        } else {
            None
        };

        if event.is_activation() {
            *self.counts.entry(event.key.clone()).or_insert(0) += 1;
        }

        closed
    }

    /// Close the current window unconditionally and start a new one at `now`
    pub fn checkpoint(&mut self, now: NaiveDateTime) -> HourlyRecord {
        let counts = std::mem::replace(&mut self.counts, seed(&self.primary_key));
        let record = HourlyRecord::new(self.last_checkpoint, counts);
        self.last_checkpoint = now;
        record
    }

    /// Feed one event and persist any closed window through `sink`
    pub fn observe_into(
        &mut self,
        event: &InputEvent,
        now: NaiveDateTime,
        sink: &mut dyn CheckpointSink,
    ) -> Result<()> {
        if let Some(record) = self.observe(event, now) {
            sink.write(&record)?;
        }
        Ok(())
    }
}

fn seed(primary_key: &str) -> BTreeMap<String, u64> {
    BTreeMap::from([(primary_key.to_string(), 0)])
}

//! Clock abstraction for reproducible block timestamps
//!
//! Appends never read ambient time directly; the caller passes a clock.

use chrono::NaiveDateTime;
use tally_core::{Result, TallyError};

/// Fixed, second-precision timestamp format. Part of every block digest.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the current wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Clock that always returns the same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    pub time: NaiveDateTime,
}

impl FixedClock {
    pub fn new(time: NaiveDateTime) -> Self {
        Self { time }
    }

    /// Parse a `YYYY-MM-DD HH:MM:SS` timestamp
    pub fn parse(timestamp: &str) -> Result<Self> {
        NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .map(Self::new)
            .map_err(|e| TallyError::InvalidFormat(format!("timestamp {:?}: {}", timestamp, e)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.time
    }
}

/// Render a timestamp the way it is stored and hashed. Sub-second precision is dropped.
pub fn format_timestamp(time: NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

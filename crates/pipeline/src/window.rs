use std::fmt;

use chrono::{DateTime, Utc};
use enpa_core::config::WindowOptions;
use enpa_core::{DataShare, EnpaError, Result};

/// Outcome of testing one creation timestamp against the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Accepted,
    /// The share carries no creation time.
    MissingTimestamp,
    /// `created_ms < lower_ms`.
    BeforeWindow,
    /// `created_ms >= upper_ms`.
    AfterWindow,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Half-open creation window `[start_time, start_time + duration)`.
///
/// Configured in epoch seconds, compared in epoch milliseconds. Bounds are
/// computed once at construction; a window that exists is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start_time: i64,
    duration: i64,
    lower_ms: i64,
    upper_ms: i64,
}

impl TimeWindow {
    /// Build a window from `start_time` and `duration`, both in seconds.
    ///
    /// Fails on a negative duration or on bounds that do not fit in i64
    /// milliseconds.
    pub fn new(start_time: i64, duration: i64) -> Result<Self> {
        if duration < 0 {
            return Err(EnpaError::NegativeDuration(duration));
        }
        let overflow = || EnpaError::WindowOverflow {
            start_time,
            duration,
        };
        let lower_ms = start_time.checked_mul(1000).ok_or_else(overflow)?;
        let upper_ms = start_time
            .checked_add(duration)
            .and_then(|end| end.checked_mul(1000))
            .ok_or_else(overflow)?;

        Ok(Self {
            start_time,
            duration,
            lower_ms,
            upper_ms,
        })
    }

    /// Build a window from raw run options. Both values are required.
    pub fn from_options(options: &WindowOptions) -> Result<Self> {
        let start_time = options
            .start_time
            .ok_or(EnpaError::MissingOption("start_time"))?;
        let duration = options
            .duration
            .ok_or(EnpaError::MissingOption("duration"))?;
        Self::new(start_time, duration)
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Inclusive lower bound, epoch milliseconds.
    pub fn lower_ms(&self) -> i64 {
        self.lower_ms
    }

    /// Exclusive upper bound, epoch milliseconds.
    pub fn upper_ms(&self) -> i64 {
        self.upper_ms
    }

    /// A zero-width window admits nothing.
    pub fn is_empty(&self) -> bool {
        self.lower_ms == self.upper_ms
    }

    pub fn contains(&self, created_ms: i64) -> bool {
        self.lower_ms <= created_ms && created_ms < self.upper_ms
    }

    pub fn verdict(&self, created_ms: Option<i64>) -> Verdict {
        match created_ms {
            None => Verdict::MissingTimestamp,
            Some(ms) if ms < self.lower_ms => Verdict::BeforeWindow,
            Some(ms) if ms >= self.upper_ms => Verdict::AfterWindow,
            Some(_) => Verdict::Accepted,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (
            DateTime::<Utc>::from_timestamp_millis(self.lower_ms),
            DateTime::<Utc>::from_timestamp_millis(self.upper_ms),
        ) {
            (Some(lower), Some(upper)) => {
                write!(f, "[{}, {})", lower.to_rfc3339(), upper.to_rfc3339())
            }
            _ => write!(f, "[{}ms, {}ms)", self.lower_ms, self.upper_ms),
        }
    }
}

/// Whether `share` was created inside `window`. Shares without a creation
/// time never are.
pub fn classify(share: &DataShare, window: &TimeWindow) -> bool {
    window.verdict(share.created_ms).is_accepted()
}

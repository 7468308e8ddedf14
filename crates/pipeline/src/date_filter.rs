//! Creation-time filter stage.
//!
//! Drops every data share whose creation time falls outside the configured
//! collection window. Rejection is the normal case for a large share of the
//! input, so it is counted rather than logged.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use enpa_core::{Config, DataShare, Result};

use crate::window::{TimeWindow, Verdict};

/// Monotonic per-stage counters. Safe to bump from any worker thread.
#[derive(Debug, Default)]
pub struct FilterCounters {
    included: AtomicU64,
    excluded: AtomicU64,
    missing_timestamp: AtomicU64,
    before_window: AtomicU64,
    after_window: AtomicU64,
}

impl FilterCounters {
    fn record(&self, verdict: Verdict) {
        let reason = match verdict {
            Verdict::Accepted => {
                self.included.fetch_add(1, Ordering::Relaxed);
                return;
            }
            Verdict::MissingTimestamp => &self.missing_timestamp,
            Verdict::BeforeWindow => &self.before_window,
            Verdict::AfterWindow => &self.after_window,
        };
        reason.fetch_add(1, Ordering::Relaxed);
        self.excluded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> FilterStats {
        FilterStats {
            included: self.included.load(Ordering::Relaxed),
            excluded: self.excluded.load(Ordering::Relaxed),
            missing_timestamp: self.missing_timestamp.load(Ordering::Relaxed),
            before_window: self.before_window.load(Ordering::Relaxed),
            after_window: self.after_window.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`FilterCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub included: u64,
    pub excluded: u64,
    pub missing_timestamp: u64,
    pub before_window: u64,
    pub after_window: u64,
}

impl FilterStats {
    pub fn total(&self) -> u64 {
        self.included + self.excluded
    }
}

/// Keeps only the data shares created inside a [`TimeWindow`].
#[derive(Debug)]
pub struct DateFilter {
    window: TimeWindow,
    counters: FilterCounters,
}

impl DateFilter {
    pub fn new(window: TimeWindow) -> Self {
        debug!(window = %window, empty = window.is_empty(), "date filter configured");
        Self {
            window,
            counters: FilterCounters::default(),
        }
    }

    /// Validate the window options of `config` and build the filter.
    ///
    /// Call before any record is read so a bad window fails the run up front.
    pub fn from_config(config: &Config) -> Result<Self> {
        let window = TimeWindow::from_options(&config.window)?;
        Ok(Self::new(window))
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    /// Pass `share` through if it was created inside the window.
    pub fn process(&self, share: DataShare) -> Option<DataShare> {
        let verdict = self.window.verdict(share.created_ms);
        self.counters.record(verdict);
        verdict.is_accepted().then_some(share)
    }

    /// Lazily filter a stream of shares on the calling thread.
    pub fn filter_iter<'a, I>(&'a self, shares: I) -> impl Iterator<Item = DataShare> + 'a
    where
        I: IntoIterator<Item = DataShare> + 'a,
        I::IntoIter: 'a,
    {
        shares.into_iter().filter_map(move |share| self.process(share))
    }

    /// Filter an in-memory batch on the current rayon pool.
    ///
    /// Survivors keep their relative input order.
    pub fn filter_par(&self, shares: Vec<DataShare>) -> Vec<DataShare> {
        let start = Instant::now();
        let before = self.counters.snapshot();
        let input = shares.len();

        let kept: Vec<DataShare> = shares
            .into_par_iter()
            .filter_map(|share| self.process(share))
            .collect();

        let after = self.counters.snapshot();
        info!(
            input,
            kept = kept.len(),
            missing_timestamp = after.missing_timestamp - before.missing_timestamp,
            before_window = after.before_window - before.before_window,
            after_window = after.after_window - before.after_window,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "date filter batch complete"
        );
        kept
    }

    pub fn stats(&self) -> FilterStats {
        self.counters.snapshot()
    }
}

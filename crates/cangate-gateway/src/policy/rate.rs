//! Sliding-window rate tracking keyed by identifier.
//!
//! Every evaluated arrival is recorded, including the ones that end up
//! blocked, so a sustained flood keeps its window full instead of
//! alternating between pass and block.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Outcome of a single rate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateCheck {
    pub allowed: bool,
    /// Arrivals inside the window, including this one.
    pub window_count: usize,
}

/// Per-identifier sliding windows.
///
/// A check holds only the shard lock of its identifier, so concurrent
/// receivers may share one tracker.
#[derive(Debug)]
pub struct RateTracker {
    window: Duration,
    max_per_window: usize,
    windows: DashMap<u32, VecDeque<Instant>>,
}

impl RateTracker {
    pub fn new(window: Duration, max_per_window: u32) -> Self {
        let max_per_window = max_per_window.max(1) as usize;
        Self {
            window,
            max_per_window,
            windows: DashMap::new(),
        }
    }

    /// Prune expired arrivals, record `now`, and report whether the window
    /// is still within the limit.
    pub fn check_and_record(&self, id: u32, now: Instant) -> RateCheck {
        let mut ts = self
            .windows
            .entry(id)
            .or_insert_with(|| VecDeque::with_capacity(self.max_per_window + 1));

        let window = self.window;
        ts.retain(|t| now.saturating_duration_since(*t) < window);
        ts.push_back(now);

        let window_count = ts.len();
        RateCheck {
            allowed: window_count <= self.max_per_window,
            window_count,
        }
    }

    /// Arrivals still inside the window at `now`, without recording.
    pub fn window_count(&self, id: u32, now: Instant) -> usize {
        self.windows
            .get(&id)
            .map(|ts| {
                ts.iter()
                    .filter(|t| now.saturating_duration_since(**t) < self.window)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Identifiers that have been rate-checked at least once.
    pub fn tracked_identifiers(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.windows.iter().map(|e| *e.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Forget every window.
    pub fn reset(&self) {
        self.windows.clear();
    }
}

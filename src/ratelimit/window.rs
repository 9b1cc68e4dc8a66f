//! Rolling window of recent grants.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Pacing state owned by a [`RateGate`](super::RateGate).
///
/// Holds the instant of the last granted fetch and the grant instants that
/// still fall inside the rolling window, oldest first. All mutation happens
/// under the gate's lock.
#[derive(Debug)]
pub struct RateWindow {
    /// When the most recent permit was (or will be) granted
    last_fetch_at: Instant,
    /// Grant instants inside the current window, ascending
    recent: VecDeque<Instant>,
    /// Upper bound on `recent.len()`
    capacity: usize,
}

impl RateWindow {
    /// Create a window whose spacing clock starts at `created_at`.
    pub fn new(created_at: Instant, capacity: usize) -> Self {
        Self {
            last_fetch_at: created_at,
            recent: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Earliest instant at or after `now` that respects `min_spacing`.
    pub fn next_slot(&self, now: Instant, min_spacing: Duration) -> Instant {
        now.max(self.last_fetch_at + min_spacing)
    }

    /// Drop grants that are at least `window` old as of `at`.
    ///
    /// Returns the number of entries removed.
    pub fn purge(&mut self, at: Instant, window: Duration) -> usize {
        let mut removed = 0;
        while let Some(&oldest) = self.recent.front() {
            if at.saturating_duration_since(oldest) < window {
                break;
            }
            self.recent.pop_front();
            removed += 1;
        }
        removed
    }

    /// Whether another grant would exceed the quota.
    pub fn is_full(&self) -> bool {
        self.recent.len() >= self.capacity
    }

    /// Record a grant at `at` and move the spacing clock forward.
    ///
    /// Callers must check [`is_full`](Self::is_full) first.
    pub fn record(&mut self, at: Instant) {
        debug_assert!(!self.is_full(), "quota exceeded");
        self.recent.push_back(at);
        self.last_fetch_at = at;
    }

    /// Time from `at` until the oldest grant leaves the window.
    pub fn duration_until_free(&self, at: Instant, window: Duration) -> Duration {
        match self.recent.front() {
            Some(&oldest) => (oldest + window).saturating_duration_since(at),
            None => Duration::ZERO,
        }
    }

    /// Number of grants currently inside the window.
    pub fn len(&self) -> usize {
        self.recent.len()
    }

    /// Whether no grants are inside the window.
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    /// Quota left before the window is full.
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.recent.len())
    }

    /// Instant of the last grant.
    pub fn last_fetch_at(&self) -> Instant {
        self.last_fetch_at
    }
}

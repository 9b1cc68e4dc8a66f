//! Process-wide pacing of outbound fetches.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

use super::window::RateWindow;
use crate::config::GateConfig;

/// Permission to perform one outbound fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permit {
    granted_at: Instant,
}

impl Permit {
    /// The instant this permit took effect.
    pub fn granted_at(&self) -> Instant {
        self.granted_at
    }
}

/// The quota for the current window is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected {
    retry_after: Duration,
}

impl Rejected {
    /// How long until the oldest grant leaves the window.
    pub fn retry_after(&self) -> Duration {
        self.retry_after
    }
}

/// Outcome of [`RateGate::acquire`].
///
/// `Rejected` is a normal outcome rather than an error: the caller decides
/// whether to report it or try again later.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The caller may fetch now.
    Permit(Permit),
    /// The rolling quota is used up.
    Rejected(Rejected),
}

impl Admission {
    /// Returns `true` if this is a permit.
    pub fn is_permit(&self) -> bool {
        matches!(self, Admission::Permit(_))
    }
}

/// Enforces minimum spacing and a rolling quota on outbound fetches.
///
/// Locking: the spacing computation, window purge, quota check and grant
/// record run as one critical section under `window`. A caller that must
/// wait for spacing reserves its grant slot inside that section and sleeps
/// after releasing the lock, so queued callers never block each other and
/// each one sees the slot its predecessor reserved.
///
/// The quota is evaluated at the instant the permit would take effect. A
/// rejected caller returns immediately without sleeping.
#[derive(Debug)]
pub struct RateGate {
    min_spacing: Duration,
    window_duration: Duration,
    window: Mutex<RateWindow>,
}

impl RateGate {
    /// Create a gate whose spacing clock starts now.
    pub fn new(config: &GateConfig) -> Self {
        Self {
            min_spacing: config.min_spacing(),
            window_duration: config.window_duration(),
            window: Mutex::new(RateWindow::new(
                Instant::now(),
                config.max_calls_per_window,
            )),
        }
    }

    /// Wait for spacing, then take one unit of quota if any is left.
    pub async fn acquire(&self) -> Admission {
        let now = Instant::now();

        let slot = {
            let mut window = self.window.lock();
            let slot = window.next_slot(now, self.min_spacing);
            let purged = window.purge(slot, self.window_duration);

            trace!(
                purged = purged,
                in_window = window.len(),
                wait_ms = slot.saturating_duration_since(now).as_millis() as u64,
                "Evaluating fetch admission"
            );

            if window.is_full() {
                let retry_after = window.duration_until_free(slot, self.window_duration);
                debug!(
                    retry_after_ms = retry_after.as_millis() as u64,
                    "Fetch quota exhausted"
                );
                return Admission::Rejected(Rejected { retry_after });
            }

            window.record(slot);
            slot
        };

        if slot > now {
            sleep_until(slot).await;
        }

        Admission::Permit(Permit { granted_at: slot })
    }

    /// Quota left in the current window.
    pub fn remaining(&self) -> usize {
        let mut window = self.window.lock();
        window.purge(Instant::now(), self.window_duration);
        window.remaining()
    }

    /// Configured minimum spacing.
    pub fn min_spacing(&self) -> Duration {
        self.min_spacing
    }

    /// Configured rolling window length.
    pub fn window_duration(&self) -> Duration {
        self.window_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn gate_config(min_spacing_ms: u64, max_calls: usize, window_secs: u64) -> GateConfig {
        GateConfig {
            min_spacing_ms,
            max_calls_per_window: max_calls,
            window_secs,
        }
    }

    fn granted(admission: Admission) -> Instant {
        match admission {
            Admission::Permit(permit) => permit.granted_at(),
            Admission::Rejected(r) => panic!("expected permit, rejected for {:?}", r.retry_after()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_acquire_paced_from_creation() {
        let gate = RateGate::new(&GateConfig::default());
        let created = Instant::now();

        let at = granted(gate.acquire().await);

        assert_eq!(at, created + Duration::from_secs(1));
        assert!(Instant::now() >= at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_grants_are_spaced() {
        let gate = RateGate::new(&GateConfig::default());

        let mut previous = granted(gate.acquire().await);
        for _ in 0..5 {
            let next = granted(gate.acquire().await);
            assert!(next.duration_since(previous) >= gate.min_spacing());
            previous = next;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_eleventh_rapid_call_rejected() {
        let gate = RateGate::new(&GateConfig::default());

        for _ in 0..10 {
            assert!(gate.acquire().await.is_permit());
        }

        match gate.acquire().await {
            Admission::Rejected(rejected) => {
                assert!(rejected.retry_after() > Duration::ZERO);
                assert!(rejected.retry_after() <= Duration::from_secs(60));
            }
            Admission::Permit(_) => panic!("11th call should be rejected"),
        }
        assert_eq!(gate.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_does_not_wait() {
        let gate = RateGate::new(&gate_config(1_000, 1, 60));
        assert!(gate.acquire().await.is_permit());

        let before = Instant::now();
        assert!(!gate.acquire().await.is_permit());
        assert_eq!(Instant::now(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_recovers_after_window() {
        let gate = RateGate::new(&gate_config(0, 2, 60));

        assert!(gate.acquire().await.is_permit());
        assert!(gate.acquire().await.is_permit());
        assert!(!gate.acquire().await.is_permit());

        tokio::time::advance(Duration::from_secs(60)).await;

        assert_eq!(gate.remaining(), 2);
        assert!(gate.acquire().await.is_permit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_never_exceed_quota() {
        let gate = Arc::new(RateGate::new(&gate_config(1_000, 10, 60)));

        let handles: Vec<_> = (0..15)
            .map(|_| {
                let gate = Arc::clone(&gate);
                tokio::spawn(async move { gate.acquire().await })
            })
            .collect();

        let mut grants = Vec::new();
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Admission::Permit(permit) => grants.push(permit.granted_at()),
                Admission::Rejected(_) => rejected += 1,
            }
        }

        assert_eq!(grants.len(), 10);
        assert_eq!(rejected, 5);

        grants.sort();
        for pair in grants.windows(2) {
            assert!(pair[1].duration_since(pair[0]) >= Duration::from_secs(1));
        }
    }
}

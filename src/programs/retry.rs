//! # Restart-delay bookkeeping for one worker process.
//!
//! [`RetryState`] tracks consecutive unhealthy runs and turns them into a
//! deterministic restart delay via [`BackoffPolicy`]:
//!
//! - the very first launch (no history) gets delay zero;
//! - a short-lived run adds 1 to the failure count;
//! - a spawn failure adds 2 — launch errors back off faster, the OS is
//!   unlikely to succeed a few milliseconds later;
//! - a run at least `healthy_after` long resets the count, so a long-healthy
//!   worker restarts immediately.
//!
//! Given the same history the produced delays are identical, and for an
//! uninterrupted failure streak they are non-decreasing up to the policy cap.

use std::time::Duration;

use crate::policies::BackoffPolicy;

/// Consecutive-failure counter for one process.
#[derive(Debug, Default)]
pub(crate) struct RetryState {
    consecutive: u32,
}

impl RetryState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Delay before the next launch given the accumulated history.
    pub(crate) fn next_delay(&self, policy: &BackoffPolicy) -> Duration {
        match self.consecutive {
            0 => Duration::ZERO,
            n => policy.next(n - 1),
        }
    }

    /// Records a completed run. `healthy` means the worker ran at least the
    /// configured healthy-run threshold before exiting.
    pub(crate) fn record_exit(&mut self, healthy: bool) {
        if healthy {
            self.consecutive = 0;
        } else {
            self.consecutive = self.consecutive.saturating_add(1);
        }
    }

    /// Records a spawn failure (worker never started).
    pub(crate) fn record_launch_failure(&mut self) {
        self.consecutive = self.consecutive.saturating_add(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::JitterPolicy;

    fn policy() -> BackoffPolicy {
        BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(10),
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }

    #[test]
    fn first_launch_has_zero_delay() {
        let state = RetryState::new();
        assert_eq!(state.next_delay(&policy()), Duration::ZERO);
    }

    #[test]
    fn repeated_failures_grow_monotonically() {
        let policy = policy();
        let mut state = RetryState::new();
        let mut prev = Duration::ZERO;
        for _ in 0..12 {
            state.record_exit(false);
            let d = state.next_delay(&policy);
            assert!(d >= prev, "delay shrank: {d:?} < {prev:?}");
            prev = d;
        }
        // Streak long enough to hit the cap.
        assert_eq!(prev, Duration::from_secs(10));
    }

    #[test]
    fn first_retry_uses_policy_first() {
        let mut state = RetryState::new();
        state.record_exit(false);
        assert_eq!(state.next_delay(&policy()), Duration::from_millis(100));
    }

    #[test]
    fn healthy_run_resets_backoff() {
        let mut state = RetryState::new();
        for _ in 0..5 {
            state.record_exit(false);
        }
        assert!(state.next_delay(&policy()) > Duration::ZERO);

        state.record_exit(true);
        assert_eq!(state.next_delay(&policy()), Duration::ZERO);
    }

    #[test]
    fn launch_failures_back_off_faster_than_exits() {
        let policy = policy();

        let mut crashed = RetryState::new();
        crashed.record_exit(false);

        let mut unspawnable = RetryState::new();
        unspawnable.record_launch_failure();

        assert!(unspawnable.next_delay(&policy) > crashed.next_delay(&policy));
    }

    #[test]
    fn counter_saturates() {
        let mut state = RetryState::new();
        state.consecutive = u32::MAX;
        state.record_launch_failure();
        assert_eq!(state.consecutive, u32::MAX);
    }
}

//! # Backoff policy for restarting workers.
//!
//! [`BackoffPolicy`] controls how restart delays grow after repeated
//! short-lived runs. It is parameterized by:
//! - [`BackoffPolicy::first`] the initial delay;
//! - [`BackoffPolicy::factor`] the multiplicative growth factor;
//! - [`BackoffPolicy::max`] the maximum delay cap.
//!
//! The delay for failure count `n` is `first × factor^n`, clamped to `max`,
//! then jitter is applied. The base delay derives purely from `n`, so jitter
//! output never feeds back into subsequent calculations.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use procvisor::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(10),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.next(0), Duration::from_millis(100));
//! assert_eq!(backoff.next(1), Duration::from_millis(200));
//! // 100ms × 2^10 = 102_400ms → capped at max=10s
//! assert_eq!(backoff.next(10), Duration::from_secs(10));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Restart backoff policy.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Initial delay for the first retry.
    pub first: Duration,
    /// Maximum delay cap.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Jitter policy applied on top of the computed delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns a policy with:
    /// - `first = 100ms`;
    /// - `factor = 2.0` (exponential);
    /// - `max = 30s`;
    /// - no jitter (deterministic delays).
    fn default() -> Self {
        Self {
            first: Duration::from_millis(100),
            max: Duration::from_secs(30),
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Computes the delay for the given failure count (0-indexed).
    ///
    /// The base delay is `first × factor^n`, clamped to [`BackoffPolicy::max`].
    /// Jitter is applied to the clamped base; the result is never fed back
    /// into subsequent calculations.
    ///
    /// # Notes
    /// - `factor == 1.0` keeps the delay constant at `first` (up to `max`).
    /// - Overflow or non-finite intermediate values clamp to `max`.
    pub fn next(&self, n: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = n.min(i32::MAX as u32) as i32;
        let unclamped = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !unclamped.is_finite() || unclamped < 0.0 || unclamped > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(unclamped)
        };

        self.jitter.apply(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(first_ms: u64, max: Duration, factor: f64) -> BackoffPolicy {
        BackoffPolicy {
            first: Duration::from_millis(first_ms),
            max,
            factor,
            jitter: JitterPolicy::None,
        }
    }

    #[test]
    fn count_zero_returns_first() {
        let policy = plain(100, Duration::from_secs(30), 2.0);
        assert_eq!(policy.next(0), Duration::from_millis(100));
    }

    #[test]
    fn exponential_growth_no_jitter() {
        let policy = plain(100, Duration::from_secs(30), 2.0);
        assert_eq!(policy.next(1), Duration::from_millis(200));
        assert_eq!(policy.next(2), Duration::from_millis(400));
        assert_eq!(policy.next(3), Duration::from_millis(800));
    }

    #[test]
    fn constant_factor_stays_flat() {
        let policy = plain(500, Duration::from_secs(30), 1.0);
        for n in 0..10 {
            assert_eq!(policy.next(n), Duration::from_millis(500));
        }
    }

    #[test]
    fn clamped_to_max() {
        let policy = plain(100, Duration::from_secs(1), 2.0);
        assert_eq!(policy.next(10), Duration::from_secs(1));
    }

    #[test]
    fn first_exceeding_max_clamps() {
        let policy = plain(10_000, Duration::from_secs(5), 2.0);
        assert_eq!(policy.next(0), Duration::from_secs(5));
    }

    #[test]
    fn non_finite_overflow_clamps_to_max() {
        let policy = plain(100, Duration::from_secs(10), 2.0);
        assert_eq!(policy.next(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn monotonic_up_to_cap() {
        let policy = plain(100, Duration::from_secs(30), 2.0);
        let mut prev = Duration::ZERO;
        for n in 0..20 {
            let d = policy.next(n);
            assert!(d >= prev, "delay shrank at n={n}: {d:?} < {prev:?}");
            prev = d;
        }
    }

    #[test]
    fn full_jitter_stays_within_base() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(1000),
            max: Duration::from_secs(30),
            factor: 1.0,
            jitter: JitterPolicy::Full,
        };
        for n in 0..50 {
            assert!(policy.next(n) <= Duration::from_millis(1000));
        }
    }

    #[test]
    fn equal_jitter_bounds() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(1000),
            max: Duration::from_secs(30),
            factor: 1.0,
            jitter: JitterPolicy::Equal,
        };
        for n in 0..50 {
            let d = policy.next(n);
            assert!(d >= Duration::from_millis(500));
            assert!(d <= Duration::from_millis(1000));
        }
    }
}

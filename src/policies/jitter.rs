//! # Jitter policy for restart delays.
//!
//! [`JitterPolicy`] adds randomness to backoff delays so that replicas of the
//! same program do not restart in lockstep.
//!
//! - [`JitterPolicy::None`] — no randomization, fully deterministic delays
//! - [`JitterPolicy::Full`] — random delay in `[0, delay]`
//! - [`JitterPolicy::Equal`] — `delay/2 + random[0, delay/2]`
//!
//! `None` is the default: the core restart contract promises deterministic
//! delays given a process's history, and jitter trades that away.

use rand::Rng;
use std::time::Duration;

/// Policy controlling randomization of restart delays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No jitter: use the exact backoff delay (default).
    #[default]
    None,

    /// Full jitter: random delay in `[0, delay]`. Most aggressive spreading.
    Full,

    /// Equal jitter: `delay/2 + random[0, delay/2]`. Preserves ~75% of the
    /// original delay on average while still decorrelating replicas.
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to the given delay.
    pub fn apply(&self, delay: Duration) -> Duration {
        if delay.is_zero() {
            return delay;
        }
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => {
                let ms = delay.as_millis() as u64;
                Duration::from_millis(rand::thread_rng().gen_range(0..=ms))
            }
            JitterPolicy::Equal => {
                let half = delay.as_millis() as u64 / 2;
                Duration::from_millis(half + rand::thread_rng().gen_range(0..=half))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        let d = Duration::from_millis(750);
        assert_eq!(JitterPolicy::None.apply(d), d);
    }

    #[test]
    fn zero_delay_passes_through() {
        for policy in [JitterPolicy::None, JitterPolicy::Full, JitterPolicy::Equal] {
            assert_eq!(policy.apply(Duration::ZERO), Duration::ZERO);
        }
    }

    #[test]
    fn full_never_exceeds_input() {
        let d = Duration::from_millis(400);
        for _ in 0..100 {
            assert!(JitterPolicy::Full.apply(d) <= d);
        }
    }

    #[test]
    fn equal_stays_in_upper_half() {
        let d = Duration::from_millis(400);
        for _ in 0..100 {
            let out = JitterPolicy::Equal.apply(d);
            assert!(out >= Duration::from_millis(200));
            assert!(out <= d);
        }
    }
}

//! # Global runtime configuration.
//!
//! [`Config`] centralizes the supervisor's knobs: the shutdown grace period,
//! the healthy-run threshold that resets backoff, the default backoff curve,
//! and the event bus capacity.
//!
//! ## Sentinel values
//! - `bus_capacity` is clamped to a minimum of 1 by the bus.

use std::time::Duration;

use crate::policies::BackoffPolicy;

/// Global configuration for the supervisor runtime.
///
/// ## Field semantics
/// - `close_timeout`: per-process grace period during shutdown. A stopping
///   worker gets this long to exit after the graceful-termination request
///   before it is forcefully killed.
/// - `healthy_after`: a worker that ran at least this long before exiting is
///   considered healthy; its consecutive-failure counter resets and the next
///   restart is immediate.
/// - `backoff`: delay curve applied between restarts of a flapping worker.
/// - `bus_capacity`: ring-buffer size of the event broadcast channel. Slow
///   subscribers that lag further than this skip older events.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time to wait for a worker's graceful exit before killing it.
    pub close_timeout: Duration,

    /// Minimum uptime after which a worker's backoff state resets.
    pub healthy_after: Duration,

    /// Restart delay curve for flapping workers.
    pub backoff: BackoffPolicy,

    /// Capacity of the event bus broadcast channel (min 1; clamped by Bus).
    pub bus_capacity: usize,
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `close_timeout = 10s`
    /// - `healthy_after = 30s`
    /// - `backoff = BackoffPolicy::default()` (100ms first, ×2, capped at 30s)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            close_timeout: Duration::from_secs(10),
            healthy_after: Duration::from_secs(30),
            backoff: BackoffPolicy::default(),
            bus_capacity: 1024,
        }
    }
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

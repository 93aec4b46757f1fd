//! # Lifecycle events emitted by the supervisor and worker processes.
//!
//! [`EventKind`] classifies events across three categories:
//! - **Process lifecycle**: launch flow (starting, started, exited,
//!   launch-failed, restart-scheduled)
//! - **Stop flow**: per-process stop requests and confirmations
//! - **Shutdown**: supervisor-level shutdown progress
//!
//! [`Event`] carries optional metadata (process name, pid, exit code, delay)
//! set via builder-style `with_*` methods depending on the kind.
//!
//! Each event has a globally unique, monotonically increasing sequence
//! number (`seq`) usable to restore order when delivery interleaves.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Process lifecycle ===
    /// A worker is about to be launched.
    ///
    /// Sets: `process`, `at`, `seq`.
    ProcessStarting,

    /// A worker was spawned successfully.
    ///
    /// Sets: `process`, `pid`, `at`, `seq`.
    ProcessStarted,

    /// A worker exited (cleanly or not).
    ///
    /// Sets: `process`, `code` (when the OS reported one), `at`, `seq`.
    ProcessExited,

    /// The OS refused to spawn a worker.
    ///
    /// Still feeds the restart loop; distinguished from `ProcessExited`
    /// because launch failures back off faster.
    ///
    /// Sets: `process`, `reason`, `at`, `seq`.
    LaunchFailed,

    /// A restart was scheduled after a computed backoff delay.
    ///
    /// Sets: `process`, `delay_ms`, `at`, `seq`.
    RestartScheduled,

    // === Stop flow ===
    /// A stop was requested for a worker (shutdown path).
    ///
    /// Sets: `process`, `at`, `seq`.
    StopRequested,

    /// A worker is fully stopped; it will not restart for the life of this
    /// supervisor run.
    ///
    /// Sets: `process`, `at`, `seq`.
    ProcessStopped,

    // === Shutdown ===
    /// Supervisor shutdown began (cancellation observed).
    ///
    /// Sets: `at`, `seq`.
    ShutdownRequested,

    /// Every worker stopped within its grace period.
    ///
    /// Sets: `at`, `seq`.
    AllStoppedWithin,

    /// At least one worker had to be forcefully killed after the grace
    /// period elapsed.
    ///
    /// Sets: `at`, `seq`.
    GraceExceeded,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the worker process, if applicable.
    pub process: Option<Arc<str>>,
    /// OS process id, when the worker is running.
    pub pid: Option<u32>,
    /// Exit code reported by the OS (`None` when killed by a signal).
    pub code: Option<i32>,
    /// Restart delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable reason (launch errors etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            process: None,
            pid: None,
            code: None,
            delay_ms: None,
            reason: None,
        }
    }

    /// Attaches a worker process name.
    #[inline]
    pub fn with_process(mut self, name: impl Into<Arc<str>>) -> Self {
        self.process = Some(name.into());
        self
    }

    /// Attaches an OS process id.
    #[inline]
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    /// Attaches an exit code.
    #[inline]
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Attaches a restart delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

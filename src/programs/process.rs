//! # Process: one supervised worker instance.
//!
//! A [`Process`] owns the full lifecycle of one OS-level worker, including
//! its delayed automatic restart. The lifecycle is an explicit state machine
//! guarded by one per-process async mutex:
//!
//! ```text
//! Idle ──run_after──► Scheduled ──timer fires──► Running ──exit──► Idle (loop)
//!   │                     │                         │
//!   └───────── stop ──────┴──────── stop ───────────┘──► Stopped (terminal)
//! ```
//!
//! ## Rules
//! - At most **one** pending restart timer exists per process; scheduling
//!   while already scheduled or running is a programming defect (debug
//!   assertion).
//! - The timer is cleared **before** the launch begins, so a concurrent
//!   `stop` never observes an already-firing timer as cancelable.
//! - `stop` and the timer callback acquire the same mutex, which closes the
//!   race between "restart just fired" and "shutdown requested": whichever
//!   wins the lock decides, and `Stopped` is terminal either way.
//! - Locks on **different** processes are independent; restarts and stops
//!   across processes proceed fully in parallel.
//!
//! A worker that fails to spawn still resolves its exit notification (with a
//! faster-backoff marker), so the restart loop never stalls on a bad launch.

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::events::{Bus, Event, EventKind};
use crate::launch::{Launch, LaunchSpec, StopHandle};
use crate::output::OutputRef;
use crate::policies::BackoffPolicy;
use crate::programs::retry::RetryState;

/// Upper bound on reaping a worker after SIGKILL. Keeps the shutdown path
/// finite even if the OS is slow to deliver the exit.
const KILL_REAP: Duration = Duration::from_secs(5);

/// Result of one scheduled run, as seen by the supervisor's dispatch task.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum RunOutcome {
    /// The worker ran (or failed to spawn) and its exit must be forwarded to
    /// the supervisor for rescheduling.
    Exited,
    /// The run never happened: the process was stopped, or the schedule was
    /// canceled before the timer fired.
    Skipped,
}

/// Point-in-time view of a process's lifecycle, for inspection and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Not running and nothing pending.
    Idle,
    /// A restart timer is pending.
    Scheduled,
    /// The worker is running.
    Running,
    /// Terminal for the life of the supervisor run.
    Stopped,
}

enum Lifecycle {
    Idle,
    Scheduled {
        /// Cancels the pending timer; owned exclusively by this state.
        cancel: CancellationToken,
    },
    Running {
        stop: Arc<dyn StopHandle>,
        /// Flips to `true` the moment the waiting task observes the exit.
        exited: watch::Receiver<bool>,
        pid: Option<u32>,
    },
    Stopped,
}

/// One supervised worker instance.
pub struct Process {
    name: Arc<str>,
    spec: LaunchSpec,
    launcher: Arc<dyn Launch>,
    output: OutputRef,
    bus: Bus,
    backoff: BackoffPolicy,
    healthy_after: Duration,
    /// Guards lifecycle transitions; see the module docs for the race this
    /// closes.
    state: Mutex<Lifecycle>,
    /// Small sync state, never held across an await.
    retry: StdMutex<RetryState>,
}

impl Process {
    pub(crate) fn new(
        name: impl Into<Arc<str>>,
        spec: LaunchSpec,
        launcher: Arc<dyn Launch>,
        output: OutputRef,
        bus: Bus,
        cfg: &Config,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            spec,
            launcher,
            output,
            bus,
            backoff: cfg.backoff,
            healthy_after: cfg.healthy_after,
            state: Mutex::new(Lifecycle::Idle),
            retry: StdMutex::new(RetryState::new()),
        })
    }

    /// Stable process name (`program` or `program-N` for replicas).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle snapshot.
    pub async fn status(&self) -> ProcessStatus {
        match &*self.state.lock().await {
            Lifecycle::Idle => ProcessStatus::Idle,
            Lifecycle::Scheduled { .. } => ProcessStatus::Scheduled,
            Lifecycle::Running { .. } => ProcessStatus::Running,
            Lifecycle::Stopped => ProcessStatus::Stopped,
        }
    }

    /// Deterministic delay before the next launch, derived from this
    /// process's failure history. Zero for the very first launch and after a
    /// healthy run.
    pub fn retry_delay(&self) -> Duration {
        self.retry.lock().expect("retry lock").next_delay(&self.backoff)
    }

    /// Schedules this process to run after `delay`, then launches it and
    /// waits for the worker to exit.
    ///
    /// Records the pending timer under the lock, sleeps cancellably, clears
    /// the timer before any work, then launches. Returns
    /// [`RunOutcome::Exited`] exactly once per actual run (including spawn
    /// failures), or [`RunOutcome::Skipped`] when a stop canceled the
    /// schedule or won the race to the lock.
    pub(crate) async fn run_after(&self, delay: Duration) -> RunOutcome {
        let cancel = CancellationToken::new();
        {
            let mut st = self.state.lock().await;
            match &*st {
                Lifecycle::Idle => {}
                Lifecycle::Stopped => return RunOutcome::Skipped,
                Lifecycle::Scheduled { .. } | Lifecycle::Running { .. } => {
                    debug_assert!(
                        false,
                        "process {}: schedule while a run is already pending",
                        self.name
                    );
                    return RunOutcome::Skipped;
                }
            }
            *st = Lifecycle::Scheduled {
                cancel: cancel.clone(),
            };
        }

        if !delay.is_zero() {
            self.bus.publish(
                Event::now(EventKind::RestartScheduled)
                    .with_process(self.name.clone())
                    .with_delay(delay),
            );
            tokio::select! {
                _ = time::sleep(delay) => {}
                _ = cancel.cancelled() => return RunOutcome::Skipped,
            }
        }

        self.fire(&cancel).await
    }

    /// Timer callback: clear the pending timer, launch, wait for the exit.
    async fn fire(&self, cancel: &CancellationToken) -> RunOutcome {
        let (mut worker, exited_tx) = {
            let mut st = self.state.lock().await;
            // A stop may have won the lock between the sleep and here.
            if cancel.is_cancelled() || !matches!(&*st, Lifecycle::Scheduled { .. }) {
                return RunOutcome::Skipped;
            }
            // Timer removed before any work begins.
            *st = Lifecycle::Idle;

            self.bus
                .publish(Event::now(EventKind::ProcessStarting).with_process(self.name.clone()));

            // Launch under the lock: start/stop transitions are serialized.
            match self
                .launcher
                .launch(&self.name, &self.spec, self.output.clone())
                .await
            {
                Ok(worker) => {
                    let pid = worker.pid();
                    let (exited_tx, exited_rx) = watch::channel(false);
                    *st = Lifecycle::Running {
                        stop: worker.stop_handle(),
                        exited: exited_rx,
                        pid,
                    };

                    let mut started = Event::now(EventKind::ProcessStarted)
                        .with_process(self.name.clone());
                    if let Some(pid) = pid {
                        started = started.with_pid(pid);
                    }
                    self.bus.publish(started);
                    (worker, exited_tx)
                }
                Err(err) => {
                    // Never started; still resolves as an exit so the
                    // supervisor reschedules.
                    self.retry
                        .lock()
                        .expect("retry lock")
                        .record_launch_failure();
                    self.bus.publish(
                        Event::now(EventKind::LaunchFailed)
                            .with_process(self.name.clone())
                            .with_reason(err.to_string()),
                    );
                    return RunOutcome::Exited;
                }
            }
        };

        let started_at = Instant::now();
        let exit = worker.wait().await;
        // Make the exit observable to a stop() waiting on the watch channel
        // *before* contending for the state lock.
        let _ = exited_tx.send(true);

        let mut st = self.state.lock().await;
        if matches!(&*st, Lifecycle::Stopped) {
            // A stop handled this exit; do not feed the restart loop.
            return RunOutcome::Skipped;
        }
        *st = Lifecycle::Idle;

        let healthy = started_at.elapsed() >= self.healthy_after;
        self.retry
            .lock()
            .expect("retry lock")
            .record_exit(healthy && exit.success());

        let mut ev = Event::now(EventKind::ProcessExited).with_process(self.name.clone());
        if let Some(code) = exit.code {
            ev = ev.with_code(code);
        }
        self.bus.publish(ev);

        RunOutcome::Exited
    }

    /// Stops this process for the rest of the supervisor run.
    ///
    /// Cancels any pending restart timer, then requests graceful termination
    /// of a running worker and waits up to `timeout` before escalating to a
    /// forceful kill. Idempotent: stopping an already-stopped process is a
    /// no-op. Returns `false` when the kill escalation was needed.
    pub async fn stop(&self, timeout: Duration) -> bool {
        let mut st = self.state.lock().await;
        match std::mem::replace(&mut *st, Lifecycle::Stopped) {
            Lifecycle::Stopped => true,
            Lifecycle::Idle => {
                self.bus
                    .publish(Event::now(EventKind::ProcessStopped).with_process(self.name.clone()));
                true
            }
            Lifecycle::Scheduled { cancel } => {
                cancel.cancel();
                self.bus
                    .publish(Event::now(EventKind::ProcessStopped).with_process(self.name.clone()));
                true
            }
            Lifecycle::Running {
                stop,
                mut exited,
                pid,
            } => {
                let mut ev =
                    Event::now(EventKind::StopRequested).with_process(self.name.clone());
                if let Some(pid) = pid {
                    ev = ev.with_pid(pid);
                }
                self.bus.publish(ev);

                stop.terminate();
                let graceful = time::timeout(timeout, exited.wait_for(|done| *done))
                    .await
                    .is_ok();
                if !graceful {
                    stop.kill();
                    // SIGKILL cannot be ignored; the reap is prompt but still
                    // bounded to keep shutdown finite.
                    let _ = time::timeout(KILL_REAP, exited.wait_for(|done| *done)).await;
                }

                self.bus
                    .publish(Event::now(EventKind::ProcessStopped).with_process(self.name.clone()));
                graceful
            }
        }
        // The lock is held for the whole stop: a timer firing concurrently
        // blocks on it and then observes Stopped.
    }
}

//! # Launch contract between the supervisor core and the OS.
//!
//! A [`Launch`] implementation spawns one worker per call and hands back a
//! [`Worker`]: an owned handle whose [`Worker::wait`] resolves **exactly
//! once**, when the underlying process terminates (cleanly, by error, or by
//! being killed). Termination requests go through a separate, shareable
//! [`StopHandle`] so a concurrent stop never needs the waiting task's
//! exclusive handle.
//!
//! Implementations outside this crate can supervise anything that fits the
//! contract (containers, remote workers); the core only sees these traits.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LaunchError;
use crate::output::OutputRef;

/// How to launch one worker: the command line and optional run-as user.
///
/// Both fields are opaque to the core; only the launcher interprets them.
#[derive(Clone, Debug)]
pub struct LaunchSpec {
    /// Command line, interpreted by the launcher (e.g. passed to `sh -c`).
    pub command: String,
    /// Optional user to run as. `None` = inherit the supervisor's user.
    pub username: Option<String>,
}

/// Terminal state of one worker run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerExit {
    /// Exit code reported by the OS; `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl WorkerExit {
    /// True when the worker exited with status zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Spawns worker processes.
#[async_trait]
pub trait Launch: Send + Sync + 'static {
    /// Launches one worker for the named process.
    ///
    /// `output` receives the worker's stdout/stderr lines for as long as it
    /// runs. A spawn failure returns [`LaunchError`]; the caller converts it
    /// into an exit notification so the restart loop never stalls.
    async fn launch(
        &self,
        process: &str,
        spec: &LaunchSpec,
        output: OutputRef,
    ) -> Result<Box<dyn Worker>, LaunchError>;
}

/// A running worker process.
#[async_trait]
pub trait Worker: Send + std::fmt::Debug {
    /// OS process id, when known.
    fn pid(&self) -> Option<u32>;

    /// Returns a shareable handle for termination requests.
    ///
    /// The handle stays valid after the worker exits; signalling a dead
    /// process is a no-op.
    fn stop_handle(&self) -> Arc<dyn StopHandle>;

    /// Waits for the worker to terminate. Resolves exactly once.
    async fn wait(&mut self) -> WorkerExit;
}

/// Termination requests for a running worker.
///
/// Shared between the task awaiting [`Worker::wait`] and the task driving
/// [`Process::stop`](crate::Process::stop); both methods are fire-and-forget
/// signals, never waits.
pub trait StopHandle: Send + Sync {
    /// Requests graceful termination (SIGTERM on Unix).
    fn terminate(&self);

    /// Forcefully kills the worker (SIGKILL on Unix).
    fn kill(&self);
}

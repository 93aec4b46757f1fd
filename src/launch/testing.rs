//! Test doubles for the launch capability.
//!
//! [`FakeLauncher`] spawns in-memory workers with a scripted run duration
//! and exit code, counts launches, and can simulate spawn failures. Paired
//! with `tokio::time::pause`, it drives the process/supervisor state
//! machines without touching the OS.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::LaunchError;
use crate::launch::{Launch, LaunchSpec, StopHandle, Worker, WorkerExit};
use crate::output::OutputRef;

/// Scripted in-memory launcher.
pub(crate) struct FakeLauncher {
    run_for: Duration,
    exit_code: i32,
    fail_spawn: bool,
    ignore_terminate: bool,
    launches: AtomicU32,
}

impl FakeLauncher {
    /// Workers run for `run_for`, then exit with `exit_code`.
    pub(crate) fn new(run_for: Duration, exit_code: i32) -> Arc<Self> {
        Arc::new(Self {
            run_for,
            exit_code,
            fail_spawn: false,
            ignore_terminate: false,
            launches: AtomicU32::new(0),
        })
    }

    /// Every launch fails at spawn time.
    pub(crate) fn failing_spawn() -> Arc<Self> {
        Arc::new(Self {
            run_for: Duration::ZERO,
            exit_code: 0,
            fail_spawn: true,
            ignore_terminate: false,
            launches: AtomicU32::new(0),
        })
    }

    /// Workers ignore graceful termination and die only on kill.
    pub(crate) fn stubborn(run_for: Duration) -> Arc<Self> {
        Arc::new(Self {
            run_for,
            exit_code: 0,
            fail_spawn: false,
            ignore_terminate: true,
            launches: AtomicU32::new(0),
        })
    }

    /// Number of launch attempts so far (including failed spawns).
    pub(crate) fn launches(&self) -> u32 {
        self.launches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Launch for FakeLauncher {
    async fn launch(
        &self,
        _process: &str,
        spec: &LaunchSpec,
        _output: OutputRef,
    ) -> Result<Box<dyn Worker>, LaunchError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail_spawn {
            return Err(LaunchError::Spawn {
                command: spec.command.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted"),
            });
        }
        Ok(Box::new(FakeWorker {
            run_for: self.run_for,
            exit_code: self.exit_code,
            ignore_terminate: self.ignore_terminate,
            stopped: CancellationToken::new(),
        }))
    }
}

#[derive(Debug)]
struct FakeWorker {
    run_for: Duration,
    exit_code: i32,
    ignore_terminate: bool,
    stopped: CancellationToken,
}

#[async_trait]
impl Worker for FakeWorker {
    fn pid(&self) -> Option<u32> {
        Some(4242)
    }

    fn stop_handle(&self) -> Arc<dyn StopHandle> {
        Arc::new(FakeStop {
            stopped: self.stopped.clone(),
            honor_terminate: !self.ignore_terminate,
        })
    }

    async fn wait(&mut self) -> WorkerExit {
        tokio::select! {
            _ = tokio::time::sleep(self.run_for) => WorkerExit { code: Some(self.exit_code) },
            // Terminated: exits as if killed by a signal.
            _ = self.stopped.cancelled() => WorkerExit { code: None },
        }
    }
}

struct FakeStop {
    stopped: CancellationToken,
    honor_terminate: bool,
}

impl StopHandle for FakeStop {
    fn terminate(&self) {
        if self.honor_terminate {
            self.stopped.cancel();
        }
    }

    fn kill(&self) {
        self.stopped.cancel();
    }
}

//! # procvisor
//!
//! **Procvisor** is a lightweight process supervisor library for Rust.
//!
//! It keeps a fixed set of named worker processes alive: each program is
//! replicated into one or more processes, every exit is reported back to one
//! control loop, and the exited worker is relaunched after a deterministic
//! backoff delay. Shutdown stops every worker gracefully within a bounded
//! timeout, escalating to a forceful kill when needed.
//!
//! ## Architecture
//! ```text
//!   add_program("web", cmd, 2, user)      add_program("cron", cmd, 1, _)
//!               │                                     │
//!               ▼                                     ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor (control loop)                                        │
//! │  - programs: name → Program { replica Processes }                 │
//! │  - exited: rendezvous channel of exited processes                 │
//! │  - Bus (broadcast events) → Subscribe fan-out                     │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   ┌──────────┐      ┌──────────┐      ┌──────────┐
//!   │  web-0   │      │  web-1   │      │   cron   │   (Process: state
//!   │ Process  │      │ Process  │      │ Process  │    machine + timer)
//!   └────┬─────┘      └────┬─────┘      └────┬─────┘
//!        │ Launch trait    │                 │
//!        ▼                 ▼                 ▼
//!    OS worker         OS worker         OS worker    (ShellLauncher:
//!    (sh -c …)         (sh -c …)         (sh -c …)     sh -c, uid/gid,
//!                                                      piped output)
//! ```
//!
//! ## Lifecycle
//! ```text
//! watch(token)
//!   ├─► dispatch every process with delay 0
//!   └─► loop {
//!         exited process received ─► dispatch(process, retry_delay())
//!         token cancelled ─► stop_all(close_timeout) ─► return
//!       }
//!
//! Process: Idle → Scheduled → Running → Idle (loop), stop → Stopped
//! ```
//!
//! ## Features
//! | Area            | Description                                          | Key types / traits                  |
//! |-----------------|------------------------------------------------------|-------------------------------------|
//! | **Supervision** | Register programs, watch, graceful shutdown.         | [`Supervisor`], [`Program`]         |
//! | **Processes**   | Per-worker lifecycle, restart timer, stop escalation.| [`Process`], [`ProcessStatus`]      |
//! | **Launching**   | Pluggable OS-process capability.                     | [`Launch`], [`Worker`], [`StopHandle`] |
//! | **Policies**    | Restart delay curve and jitter.                      | [`BackoffPolicy`], [`JitterPolicy`] |
//! | **Output**      | Injected sink for worker stdout/stderr.              | [`OutputSink`], [`OutputFn`]        |
//! | **Events**      | Lifecycle events for logging/metrics.                | [`Subscribe`], [`Event`], [`EventKind`] |
//! | **Errors**      | Typed setup and launch errors.                       | [`SupervisorError`], [`LaunchError`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use procvisor::{Config, OutputFn, ShellLauncher, Supervisor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::default();
//!     cfg.close_timeout = Duration::from_secs(5);
//!
//!     let output = OutputFn::arc(|proc, stream, line| {
//!         println!("[{proc}/{}] {line}", stream.as_label());
//!     });
//!
//!     let mut sup = Supervisor::new(
//!         cfg,
//!         Arc::new(ShellLauncher::default()),
//!         output,
//!         Vec::new(),
//!     );
//!     sup.add_program("web", "exec my-server --port 8080", 2, None)?;
//!
//!     // Blocks until SIGINT/SIGTERM; workers restart with backoff until then.
//!     sup.run().await;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod launch;
mod output;
mod policies;
mod programs;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use core::Supervisor;
pub use error::{LaunchError, SupervisorError};
pub use events::{Event, EventKind};
pub use launch::{Launch, LaunchSpec, StopHandle, Worker, WorkerExit};
pub use output::{NullOutput, OutputFn, OutputRef, OutputSink, StreamKind};
pub use policies::{BackoffPolicy, JitterPolicy};
pub use programs::{Process, ProcessStatus, Program};
pub use subscribers::Subscribe;

// Unix-only production launcher (`sh -c`, uid/gid, SIGTERM/SIGKILL).
#[cfg(unix)]
pub use launch::ShellLauncher;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

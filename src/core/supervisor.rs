//! # Supervisor: launches programs, reschedules exits, drives shutdown.
//!
//! The [`Supervisor`] owns the program table, the event bus, and a
//! rendezvous channel through which every worker exit is reported back to
//! one control loop.
//!
//! ## High-level architecture
//! ```text
//! Setup (before watch):
//!   add_program("web", cmd, 2, user) ──► Program { web-0, web-1 }
//!   add_program("worker", cmd, 1, _) ──► Program { worker }
//!
//! watch(token):
//!   1. every process dispatched immediately (delay = 0), one task each
//!   2. control loop multiplexes:
//!        ┌─► exited_rx.recv() ──► dispatch(process, process.retry_delay())
//!        └─► token.cancelled() ─► stop_all(close_timeout) ─► return
//!
//! Dispatch task (one per scheduled run):
//!   process.run_after(delay)           (sleep → launch → wait for exit)
//!        └─ Exited ──► exited_tx.send(process).await
//!                      (parks until the control loop receives — rendezvous
//!                       backpressure; other processes run unaffected)
//! ```
//!
//! ## Rules
//! - Every restart decision flows through the one channel: a single owner
//!   applies restart policy while launches and stops stay fully parallel
//!   across processes.
//! - The loop never waits on a *specific* process; it multiplexes over "any
//!   exit" and "shutdown requested".
//! - Registration happens strictly before `watch`; the `&mut self` receivers
//!   make concurrent add-while-watching unrepresentable.
//! - Shutdown stops all processes **concurrently**, so `watch` returns in
//!   roughly `close_timeout`, not `close_timeout × N`.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use procvisor::{Config, OutputFn, ShellLauncher, Supervisor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let output = OutputFn::arc(|proc, stream, line| {
//!         println!("[{proc}/{}] {line}", stream.as_label());
//!     });
//!     let mut sup = Supervisor::new(
//!         Config::default(),
//!         Arc::new(ShellLauncher::default()),
//!         output,
//!         Vec::new(),
//!     );
//!     sup.add_program("web", "exec my-server --port 8080", 2, None)?;
//!     sup.add_program("cron", "exec my-ticker", 1, Some("nobody"))?;
//!
//!     // Blocks until SIGINT/SIGTERM, then stops everything gracefully.
//!     sup.run().await;
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::shutdown;
use crate::error::SupervisorError;
use crate::events::{Bus, Event, EventKind};
use crate::launch::Launch;
use crate::output::OutputRef;
use crate::programs::{Process, Program, RunOutcome};
use crate::subscribers::Subscribe;

/// Keeps a fixed set of named programs alive until told to shut down.
pub struct Supervisor {
    cfg: Config,
    bus: Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,
    launcher: Arc<dyn Launch>,
    output: OutputRef,
    programs: HashMap<String, Program>,
    /// Rendezvous channel of exited processes. Capacity 1: a dispatch task's
    /// send parks until the control loop is ready to receive, so only one
    /// restart decision is accepted at a time.
    exited_tx: mpsc::Sender<Arc<Process>>,
    exited_rx: mpsc::Receiver<Arc<Process>>,
}

impl Supervisor {
    /// Creates a supervisor with the given config, launch capability, output
    /// sink, and event subscribers.
    pub fn new(
        cfg: Config,
        launcher: Arc<dyn Launch>,
        output: OutputRef,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let (exited_tx, exited_rx) = mpsc::channel(1);
        Self {
            cfg,
            bus,
            subscribers,
            launcher,
            output,
            programs: HashMap::new(),
            exited_tx,
            exited_rx,
        }
    }

    /// Registers a program and eagerly creates its replica processes.
    ///
    /// Must be called before [`watch`](Self::watch). Duplicate names are
    /// rejected; re-adding never replaces a registered program.
    pub fn add_program(
        &mut self,
        name: &str,
        command: &str,
        replicas: usize,
        username: Option<&str>,
    ) -> Result<(), SupervisorError> {
        if self.programs.contains_key(name) {
            return Err(SupervisorError::DuplicateProgram { name: name.into() });
        }
        let program = Program::new(
            name,
            command,
            replicas,
            username,
            self.launcher.clone(),
            self.output.clone(),
            self.bus.clone(),
            &self.cfg,
        );
        self.programs.insert(name.to_string(), program);
        Ok(())
    }

    /// Read-only view of the program table.
    pub fn programs(&self) -> &HashMap<String, Program> {
        &self.programs
    }

    /// The main control loop. Blocks until `shutdown` fires, then stops
    /// every process with the configured `close_timeout` and returns.
    pub async fn watch(&mut self, shutdown: CancellationToken) {
        self.spawn_subscriber_listener();

        let mut dispatches = JoinSet::new();
        let initial: Vec<Arc<Process>> = self
            .programs
            .values()
            .flat_map(|p| p.processes().iter().cloned())
            .collect();
        for process in initial {
            Self::dispatch(&self.exited_tx, &mut dispatches, process, Duration::ZERO);
        }

        loop {
            tokio::select! {
                maybe = self.exited_rx.recv() => match maybe {
                    Some(process) => {
                        let delay = process.retry_delay();
                        Self::dispatch(&self.exited_tx, &mut dispatches, process, delay);
                    }
                    // Unreachable while we hold a sender; kept for totality.
                    None => break,
                },
                _ = shutdown.cancelled() => {
                    self.bus.publish(Event::now(EventKind::ShutdownRequested));
                    self.stop_all().await;
                    break;
                }
            }
        }

        // Remaining dispatch tasks are parked on the rendezvous send or
        // already skipped by their stopped process; abort and reap them.
        dispatches.shutdown().await;
    }

    /// Convenience entry point: runs [`watch`](Self::watch) wired to OS
    /// termination signals (SIGINT/SIGTERM/SIGQUIT).
    pub async fn run(&mut self) {
        let token = CancellationToken::new();
        let signal_token = token.clone();
        tokio::spawn(async move {
            // If signal registration fails, shut down rather than run
            // unsupervised forever.
            let _ = shutdown::wait_for_shutdown_signal().await;
            signal_token.cancel();
        });
        self.watch(token).await;
    }

    /// Spawns one task that schedules `process` after `delay` and forwards
    /// its exit into the rendezvous channel.
    fn dispatch(
        exited_tx: &mpsc::Sender<Arc<Process>>,
        dispatches: &mut JoinSet<()>,
        process: Arc<Process>,
        delay: Duration,
    ) {
        let tx = exited_tx.clone();
        dispatches.spawn(async move {
            if matches!(process.run_after(delay).await, RunOutcome::Exited) {
                // Rendezvous backpressure: parks until the control loop
                // receives this exit.
                let _ = tx.send(process).await;
            }
        });
    }

    /// Stops every process concurrently, each bounded by `close_timeout`,
    /// and publishes the shutdown summary event.
    async fn stop_all(&self) {
        let close_timeout = self.cfg.close_timeout;
        let mut stops = JoinSet::new();
        for program in self.programs.values() {
            for process in program.processes() {
                let process = process.clone();
                stops.spawn(async move { process.stop(close_timeout).await });
            }
        }

        let mut all_graceful = true;
        while let Some(res) = stops.join_next().await {
            all_graceful &= res.unwrap_or(false);
        }
        self.bus.publish(Event::now(if all_graceful {
            EventKind::AllStoppedWithin
        } else {
            EventKind::GraceExceeded
        }));
    }

    /// Subscribes to the bus and forwards events to the subscribers.
    fn spawn_subscriber_listener(&self) {
        if self.subscribers.is_empty() {
            return;
        }
        let mut rx = self.bus.subscribe();
        let subs = self.subscribers.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        for sub in &subs {
                            sub.on_event(&ev).await;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}

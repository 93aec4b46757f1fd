//! Process launch capability.
//!
//! The supervisor core never talks to the OS directly: it depends on the
//! [`Launch`] trait to turn a [`LaunchSpec`] into a running [`Worker`], and
//! on the worker's [`StopHandle`] to request graceful or forceful
//! termination.
//!
//! ## Contents
//! - [`Launch`], [`Worker`], [`StopHandle`], [`LaunchSpec`], [`WorkerExit`]
//!   — the capability contract
//! - [`ShellLauncher`] (Unix) — production implementation on
//!   `tokio::process`, with optional run-as user and piped output

mod launcher;
#[cfg(unix)]
mod shell;

pub use launcher::{Launch, LaunchSpec, StopHandle, Worker, WorkerExit};
#[cfg(unix)]
pub use shell::ShellLauncher;

#[cfg(test)]
pub(crate) mod testing;

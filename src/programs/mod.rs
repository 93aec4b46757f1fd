//! Programs and their worker processes.
//!
//! ## Contents
//! - [`Program`] — a named replica group; passive container created at
//!   registration time
//! - [`Process`] — one worker instance: lifecycle state machine, restart
//!   timer, stop escalation
//! - `retry` — consecutive-failure bookkeeping feeding the backoff policy

mod process;
mod program;
mod retry;

pub use process::{Process, ProcessStatus};
pub use program::Program;

pub(crate) use process::RunOutcome;

//! Error types used by the procvisor runtime and the process launcher.
//!
//! Two enums cover the error surface:
//!
//! - [`SupervisorError`] — setup-time misconfiguration reported to the caller.
//! - [`LaunchError`] — failures while spawning an OS worker.
//!
//! Process-level failures (a worker exiting, crashing, or failing to spawn)
//! are **not** fatal to the supervisor: they feed the restart loop and never
//! surface as a `SupervisorError`. Both enums provide `as_label` helpers for
//! logs/metrics.

use thiserror::Error;

/// Errors reported by [`Supervisor`](crate::Supervisor) setup.
///
/// The supervisor's job is to keep retrying its workers, so only
/// configuration mistakes made before `watch` begins are surfaced here.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SupervisorError {
    /// A program with this name is already registered.
    ///
    /// Re-adding never replaces: registration is rejected so a typo in a
    /// config cannot silently drop a running service definition.
    #[error("program {name:?} is already registered")]
    DuplicateProgram {
        /// The duplicated program name.
        name: String,
    },
}

impl SupervisorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SupervisorError::DuplicateProgram { .. } => "duplicate_program",
        }
    }
}

/// Errors produced while launching an OS worker process.
///
/// A launch error still resolves the worker's exit notification, so the
/// supervisor reschedules it with backoff instead of stalling.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The OS refused to spawn the process.
    #[error("failed to spawn {command:?}: {source}")]
    Spawn {
        /// The command line that was being launched.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The configured run-as user does not exist on this host.
    #[error("unknown user {username:?}")]
    UnknownUser {
        /// The username that failed to resolve.
        username: String,
    },
}

impl LaunchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            LaunchError::Spawn { .. } => "launch_spawn_failed",
            LaunchError::UnknownUser { .. } => "launch_unknown_user",
        }
    }
}

//! Runtime core: orchestration and lifecycle.
//!
//! The only public API from this module is [`Supervisor`], which owns the
//! program table and drives the launch/restart/shutdown control loop.
//!
//! Internal modules:
//! - [`supervisor`]: program table, rendezvous channel, `watch` loop;
//! - [`shutdown`]: cross-platform termination-signal handling for
//!   [`Supervisor::run`].

mod shutdown;
mod supervisor;

pub use supervisor::Supervisor;

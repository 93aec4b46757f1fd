//! Restart delay policies.
//!
//! This module groups the knobs that control **how long** to wait between
//! restarts of a flapping worker.
//!
//! ## Contents
//! - [`BackoffPolicy`] — how delays evolve (first / factor / max + jitter)
//! - [`JitterPolicy`] — randomization strategy to avoid thundering herd
//!
//! ## Quick wiring
//! ```text
//! Config { backoff: BackoffPolicy }
//!      └─► programs::retry::RetryState feeds the consecutive-failure count
//!          into backoff.next(n) to produce the next restart delay
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → first=100ms, factor=2.0, max=30s.
//! - `JitterPolicy::None` — restart delays stay deterministic given a
//!   process's failure history. Opt into `Full`/`Equal` only when spreading
//!   synchronized restarts matters more than exact determinism.

mod backoff;
mod jitter;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;

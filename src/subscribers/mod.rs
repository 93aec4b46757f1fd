//! Event subscribers.
//!
//! ## Contents
//! - [`Subscribe`] — the extension point for plugging custom event handlers
//!   (logging, metrics, alerting) into the runtime
//! - [`LogWriter`] — built-in stdout logger (feature `logging`)

mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;

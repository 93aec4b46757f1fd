//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by the supervisor and its
//! worker processes.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] — event classification and payload metadata
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//!
//! Publishers: `Supervisor`, `Process`. Consumer: the supervisor's
//! subscriber listener, which forwards events to [`Subscribe`](crate::Subscribe)
//! implementations.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};

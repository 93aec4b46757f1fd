//! # Core subscriber trait.
//!
//! `Subscribe` is the extension point for observing the runtime. The
//! supervisor spawns one listener task that receives every [`Event`] from
//! the bus and forwards it to each subscriber in turn.
//!
//! ## Contract
//! - Handlers run on the shared listener task: keep them fast and
//!   non-blocking (fire async I/O, push to a queue — do not sleep).
//! - A subscriber that lags the bus beyond its capacity skips the oldest
//!   events; restart coordination is unaffected, only observability.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

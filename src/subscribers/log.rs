//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [starting] process=web-0
//! [started] process=web-0 pid=4242
//! [exited] process=web-0 code=1
//! [launch-failed] process=web-0 reason="failed to spawn ..."
//! [restart-scheduled] process=web-0 delay=200ms
//! [stop-requested] process=web-0
//! [stopped] process=web-0
//! [shutdown-requested]
//! [all-stopped-within-grace]
//! [grace-exceeded]
//! ```
//!
//! Not intended for production use — implement a custom
//! [`Subscribe`](crate::Subscribe) for structured logging or metrics.

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber. Enabled via the `logging` feature.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let name = e.process.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::ProcessStarting => {
                println!("[starting] process={name}");
            }
            EventKind::ProcessStarted => match e.pid {
                Some(pid) => println!("[started] process={name} pid={pid}"),
                None => println!("[started] process={name}"),
            },
            EventKind::ProcessExited => match e.code {
                Some(code) => println!("[exited] process={name} code={code}"),
                None => println!("[exited] process={name} signal"),
            },
            EventKind::LaunchFailed => {
                println!("[launch-failed] process={name} reason={:?}", e.reason);
            }
            EventKind::RestartScheduled => {
                println!(
                    "[restart-scheduled] process={name} delay={}ms",
                    e.delay_ms.unwrap_or(0)
                );
            }
            EventKind::StopRequested => {
                println!("[stop-requested] process={name}");
            }
            EventKind::ProcessStopped => {
                println!("[stopped] process={name}");
            }
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested]");
            }
            EventKind::AllStoppedWithin => {
                println!("[all-stopped-within-grace]");
            }
            EventKind::GraceExceeded => {
                println!("[grace-exceeded]");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}

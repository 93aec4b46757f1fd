//! # Output capability: where worker stdout/stderr lines go.
//!
//! The supervisor core implements no buffering or formatting policy for
//! worker output. It only carries a contract: given a process identity, an
//! injected sink consumes its output line by line.
//!
//! This module defines the [`OutputSink`] trait and a closure-backed
//! implementation, [`OutputFn`], for quick wiring. The shared handle type is
//! [`OutputRef`] (`Arc<dyn OutputSink>`).

use std::sync::Arc;

use async_trait::async_trait;

/// Which output stream a line came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamKind {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl StreamKind {
    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

/// Consumer of worker process output.
///
/// Called from per-process reader tasks; implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait OutputSink: Send + Sync + 'static {
    /// Handles one line of output from the named worker.
    async fn on_line(&self, process: &str, stream: StreamKind, line: &str);
}

/// Shared handle to an output sink.
pub type OutputRef = Arc<dyn OutputSink>;

/// Closure-backed output sink.
///
/// Wraps a synchronous closure `Fn(&str, StreamKind, &str)`. For sinks that
/// need async I/O, implement [`OutputSink`] directly.
///
/// # Example
/// ```rust
/// use procvisor::{OutputFn, OutputRef};
///
/// let sink: OutputRef = OutputFn::arc(|proc, stream, line| {
///     println!("[{proc}/{}] {line}", stream.as_label());
/// });
/// ```
pub struct OutputFn<F> {
    f: F,
}

impl<F> OutputFn<F>
where
    F: Fn(&str, StreamKind, &str) + Send + Sync + 'static,
{
    /// Creates a new closure-backed sink.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the sink and returns it as a shared handle.
    pub fn arc(f: F) -> OutputRef {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F> OutputSink for OutputFn<F>
where
    F: Fn(&str, StreamKind, &str) + Send + Sync + 'static,
{
    async fn on_line(&self, process: &str, stream: StreamKind, line: &str) {
        (self.f)(process, stream, line);
    }
}

/// Sink that discards all output.
///
/// Useful as a default and in tests.
pub struct NullOutput;

#[async_trait]
impl OutputSink for NullOutput {
    async fn on_line(&self, _process: &str, _stream: StreamKind, _line: &str) {}
}

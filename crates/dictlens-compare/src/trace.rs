//! Trace sinks receiving one human-readable message per comparison decision.
//!
//! The sink is passed to each comparison explicitly; there is no global
//! trace configuration. Implementations must be safe to share between
//! comparisons running on different threads.

use std::sync::{Arc, Mutex, PoisonError};

/// Target used by [`TracingSink`] events.
pub const TRACE_TARGET: &str = "dictlens::trace";

/// Receives diagnostic messages from the comparator.
///
/// Emitting must not influence the comparison in any way.
pub trait TraceSink: Send + Sync {
    /// Record one message.
    fn emit(&self, message: &str);
}

impl<S: TraceSink + ?Sized> TraceSink for &S {
    fn emit(&self, message: &str) {
        (**self).emit(message);
    }
}

impl<S: TraceSink + ?Sized> TraceSink for Arc<S> {
    fn emit(&self, message: &str) {
        (**self).emit(message);
    }
}

impl<S: TraceSink + ?Sized> TraceSink for Box<S> {
    fn emit(&self, message: &str) {
        (**self).emit(message);
    }
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {
    fn emit(&self, _message: &str) {}
}

/// Forwards every message to `tracing` at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn emit(&self, message: &str) {
        tracing::debug!(target: TRACE_TARGET, "{message}");
    }
}

/// Buffers messages in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every message recorded so far.
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Number of messages recorded.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns `true` if any recorded message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|m| m.contains(needle))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // A panic while pushing cannot leave the Vec half-written.
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TraceSink for CollectingSink {
    fn emit(&self, message: &str) {
        self.lock().push(message.to_string());
    }
}

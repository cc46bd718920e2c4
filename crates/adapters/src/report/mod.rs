// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic event sinks

mod noop;
mod tracing_sink;

pub use noop::NoOpEventSink;
pub use tracing_sink::TracingEventSink;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeEventSink, ReportedEvent, Severity};

/// Receiver for user-facing diagnostics from the pool.
///
/// Fire-and-forget: implementations must not block and cannot fail.
pub trait EventSink: Send + Sync + 'static {
    fn info(&self, message: &str);

    fn warn(&self, message: &str);
}

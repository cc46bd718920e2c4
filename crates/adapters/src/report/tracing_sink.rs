// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event sink that forwards to `tracing`.

use super::EventSink;

/// Forwards events to the `tracing` subscriber under the `worker_pool` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn info(&self, message: &str) {
        tracing::info!(target: "worker_pool", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "worker_pool", "{}", message);
    }
}

#[cfg(test)]
#[path = "tracing_sink_tests.rs"]
mod tests;

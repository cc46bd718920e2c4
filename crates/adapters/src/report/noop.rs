// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op event sink.

use super::EventSink;

/// Event sink that silently discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpEventSink;

impl NoOpEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for NoOpEventSink {
    fn info(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}
}

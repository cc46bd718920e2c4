// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake event sink for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::EventSink;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
}

/// Recorded event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedEvent {
    pub severity: Severity,
    pub message: String,
}

/// Fake event sink for testing
#[derive(Clone, Default)]
pub struct FakeEventSink {
    events: Arc<Mutex<Vec<ReportedEvent>>>,
}

impl FakeEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded events
    pub fn events(&self) -> Vec<ReportedEvent> {
        self.events.lock().clone()
    }

    /// Messages of recorded info events
    pub fn infos(&self) -> Vec<String> {
        self.messages(Severity::Info)
    }

    /// Messages of recorded warnings
    pub fn warnings(&self) -> Vec<String> {
        self.messages(Severity::Warn)
    }

    fn messages(&self, severity: Severity) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.severity == severity)
            .map(|e| e.message.clone())
            .collect()
    }

    fn record(&self, severity: Severity, message: &str) {
        self.events.lock().push(ReportedEvent {
            severity,
            message: message.to_string(),
        });
    }
}

impl EventSink for FakeEventSink {
    fn info(&self, message: &str) {
        self.record(Severity::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(Severity::Warn, message);
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

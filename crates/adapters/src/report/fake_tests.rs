// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_sink_records_events_in_order() {
    let sink = FakeEventSink::new();
    sink.info("Created new worker");
    sink.warn("files changed");
    sink.info("Destroying worker");

    let events = sink.events();
    assert_eq!(events.len(), 3);
    assert_eq!(events[1].severity, Severity::Warn);
    assert_eq!(sink.infos(), vec!["Created new worker", "Destroying worker"]);
    assert_eq!(sink.warnings(), vec!["files changed"]);
}

#[test]
fn fake_sink_clones_share_events() {
    let sink = FakeEventSink::new();
    let clone = sink.clone();
    clone.warn("shared");
    assert_eq!(sink.warnings(), vec!["shared"]);
}

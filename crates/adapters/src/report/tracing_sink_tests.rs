// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::NoOpEventSink;
use serial_test::serial;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture(f: impl FnOnce()) -> String {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = logs.logs.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).to_string()
}

#[test]
#[serial(tracing)]
fn tracing_sink_forwards_with_level() {
    let logs = capture(|| {
        let sink = TracingEventSink::new();
        sink.info("Created new sandboxed Javac worker (id 0)");
        sink.warn("Javac worker (id 0) can no longer be used");
    });

    assert!(logs.contains("INFO"), "logs: {}", logs);
    assert!(logs.contains("WARN"), "logs: {}", logs);
    assert!(logs.contains("worker_pool"), "logs: {}", logs);
    assert!(logs.contains("Created new sandboxed Javac worker (id 0)"));
}

#[test]
#[serial(tracing)]
fn noop_sink_is_silent() {
    let logs = capture(|| {
        let sink = NoOpEventSink::new();
        sink.info("nothing");
        sink.warn("nothing");
    });
    assert!(logs.is_empty(), "logs: {}", logs);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the pool crate.

use crate::{WorkerFactory, WorkerOptions, WorkerPool};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};
use wk_adapters::{FakeEventSink, FakeProcessAdapter};

/// Factory wired to fakes, with its base directory in a temp dir.
pub(crate) struct TestFactory {
    pub factory: WorkerFactory<FakeProcessAdapter>,
    pub process: FakeProcessAdapter,
    pub reporter: FakeEventSink,
    pub base: TempDir,
}

pub(crate) fn test_factory(options: WorkerOptions) -> TestFactory {
    let base = tempdir().unwrap();
    let process = FakeProcessAdapter::new();
    let reporter = FakeEventSink::new();
    let factory = WorkerFactory::new(process.clone(), base.path(), options)
        .with_reporter(Arc::new(reporter.clone()));
    TestFactory {
        factory,
        process,
        reporter,
        base,
    }
}

/// Pool wired to fakes.
pub(crate) struct TestPool {
    pub pool: Arc<WorkerPool<FakeProcessAdapter>>,
    pub process: FakeProcessAdapter,
    pub reporter: FakeEventSink,
    // Held for its Drop
    #[allow(dead_code)]
    pub base: TempDir,
}

pub(crate) fn test_pool(options: WorkerOptions) -> TestPool {
    let TestFactory {
        factory,
        process,
        reporter,
        base,
    } = test_factory(options);
    TestPool {
        pool: Arc::new(WorkerPool::new(factory)),
        process,
        reporter,
        base,
    }
}

/// Verbose options with `max_instances` per key.
pub(crate) fn options(max_instances: usize) -> WorkerOptions {
    WorkerOptions::new(max_instances)
        .with_verbose(true)
        .with_terminate_grace(std::time::Duration::from_millis(10))
}

/// Poll `cond` until it holds, failing the test after about a second.
pub(crate) async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if cond() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    }
    panic!("condition not reached in time");
}

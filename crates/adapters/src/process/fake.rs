// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ProcessAdapter, ProcessError, SpawnConfig};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// Recorded process call
#[derive(Debug, Clone)]
pub enum ProcessCall {
    Spawn { config: SpawnConfig },
    IsAlive { id: String },
    Terminate { id: String, grace: Duration },
}

/// Fake process state
#[derive(Debug, Clone)]
pub struct FakeProcess {
    pub config: SpawnConfig,
    pub alive: bool,
    pub terminate_count: usize,
}

struct FakeProcessState {
    processes: HashMap<String, FakeProcess>,
    calls: Vec<ProcessCall>,
    spawn_errors: VecDeque<String>,
    terminate_error: Option<String>,
    spawn_delay: Option<Duration>,
    next_id: u64,
}

/// Fake process adapter for testing
///
/// Records every call, and can be told to fail spawns or terminations.
#[derive(Clone)]
pub struct FakeProcessAdapter {
    inner: Arc<Mutex<FakeProcessState>>,
}

impl Default for FakeProcessAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeProcessState {
                processes: HashMap::new(),
                calls: Vec::new(),
                spawn_errors: VecDeque::new(),
                terminate_error: None,
                spawn_delay: None,
                next_id: 0,
            })),
        }
    }
}

impl FakeProcessAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ProcessCall> {
        self.inner.lock().calls.clone()
    }

    /// Get a process by ID
    pub fn get_process(&self, id: &str) -> Option<FakeProcess> {
        self.inner.lock().processes.get(id).cloned()
    }

    /// Number of successful spawns so far
    pub fn spawn_count(&self) -> usize {
        self.inner.lock().processes.len()
    }

    /// Number of processes spawned and not yet terminated
    pub fn live_count(&self) -> usize {
        self.inner
            .lock()
            .processes
            .values()
            .filter(|p| p.terminate_count == 0)
            .count()
    }

    /// Fail the next spawn with `message` (queued; one error per call)
    pub fn fail_next_spawn(&self, message: impl Into<String>) {
        self.inner.lock().spawn_errors.push_back(message.into());
    }

    /// Make every terminate call fail with `message`
    pub fn set_terminate_error(&self, message: impl Into<String>) {
        self.inner.lock().terminate_error = Some(message.into());
    }

    /// Delay each spawn, to widen race windows in concurrency tests
    pub fn set_spawn_delay(&self, delay: Duration) {
        self.inner.lock().spawn_delay = Some(delay);
    }

    /// Mark a process as exited without terminating it
    pub fn set_exited(&self, id: &str) {
        if let Some(process) = self.inner.lock().processes.get_mut(id) {
            process.alive = false;
        }
    }
}

#[async_trait]
impl ProcessAdapter for FakeProcessAdapter {
    async fn spawn(&self, config: &SpawnConfig) -> Result<String, ProcessError> {
        let delay = {
            let mut inner = self.inner.lock();
            inner.calls.push(ProcessCall::Spawn {
                config: config.clone(),
            });
            inner.spawn_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.inner.lock();
        if let Some(message) = inner.spawn_errors.pop_front() {
            return Err(ProcessError::SpawnFailed(message));
        }
        if config.args.is_empty() {
            return Err(ProcessError::EmptyCommand);
        }
        let id = format!("fake-{}", inner.next_id);
        inner.next_id += 1;
        inner.processes.insert(
            id.clone(),
            FakeProcess {
                config: config.clone(),
                alive: true,
                terminate_count: 0,
            },
        );
        Ok(id)
    }

    fn is_alive(&self, id: &str) -> bool {
        let mut inner = self.inner.lock();
        inner.calls.push(ProcessCall::IsAlive { id: id.to_string() });
        inner.processes.get(id).map(|p| p.alive).unwrap_or(false)
    }

    async fn terminate(&self, id: &str, grace: Duration) -> Result<(), ProcessError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ProcessCall::Terminate {
            id: id.to_string(),
            grace,
        });
        if let Some(process) = inner.processes.get_mut(id) {
            process.terminate_count += 1;
            process.alive = false;
        }
        match &inner.terminate_error {
            Some(message) => Err(ProcessError::TerminateFailed(message.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

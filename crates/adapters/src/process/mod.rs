// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker process adapters

mod local;

pub use local::LocalProcessAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProcess, FakeProcessAdapter, ProcessCall};

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors from process operations
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("empty command line")]
    EmptyCommand,
    #[error("cannot open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("terminate failed: {0}")]
    TerminateFailed(String),
}

/// Everything needed to start one worker process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnConfig {
    /// Program followed by its arguments
    pub args: Vec<String>,
    /// Working directory of the process
    pub cwd: PathBuf,
    /// Extra environment variables
    pub env: Vec<(String, String)>,
    /// File receiving the process's diagnostic output (appended)
    pub log_path: PathBuf,
}

/// Adapter for starting and stopping worker processes.
///
/// Processes are addressed by the opaque id returned from `spawn`.
#[async_trait]
pub trait ProcessAdapter: Clone + Send + Sync + 'static {
    /// Start a process, returning its id
    async fn spawn(&self, config: &SpawnConfig) -> Result<String, ProcessError>;

    /// Non-blocking liveness probe. Unknown ids are not alive.
    fn is_alive(&self, id: &str) -> bool;

    /// Stop a process: ask it to exit, wait up to `grace`, then kill it.
    ///
    /// Terminating an unknown or already terminated id succeeds.
    async fn terminate(&self, id: &str, grace: Duration) -> Result<(), ProcessError>;
}

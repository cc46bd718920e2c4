// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local OS process adapter

use super::{ProcessAdapter, ProcessError, SpawnConfig};
use crate::subprocess::{wait_with_timeout, KILL_REAP_TIMEOUT};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::{Child, Command};

/// Spawns workers as child processes of the current process.
///
/// The worker's stdin is held open for the life of the process; closing it is
/// the polite request to exit. stdout and stderr are appended to the log file.
#[derive(Clone, Default)]
pub struct LocalProcessAdapter {
    inner: Arc<Mutex<LocalState>>,
}

#[derive(Default)]
struct LocalState {
    children: HashMap<String, Child>,
    next_id: u64,
}

impl LocalProcessAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// OS pid of a tracked process.
    pub fn pid(&self, id: &str) -> Option<u32> {
        self.inner.lock().children.get(id).and_then(|c| c.id())
    }
}

#[async_trait]
impl ProcessAdapter for LocalProcessAdapter {
    async fn spawn(&self, config: &SpawnConfig) -> Result<String, ProcessError> {
        let (program, args) = config.args.split_first().ok_or(ProcessError::EmptyCommand)?;

        let log_err = |source| ProcessError::LogFile {
            path: config.log_path.clone(),
            source,
        };
        if let Some(parent) = config.log_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(log_err)?;
        }
        let stdout = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_path)
            .await
            .map_err(log_err)?
            .into_std()
            .await;
        let stderr = stdout.try_clone().map_err(log_err)?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(&config.cwd)
            .envs(config.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| ProcessError::SpawnFailed(format!("{}: {}", program, e)))?;

        let mut state = self.inner.lock();
        let id = format!("proc-{}", state.next_id);
        state.next_id += 1;
        state.children.insert(id.clone(), child);
        Ok(id)
    }

    fn is_alive(&self, id: &str) -> bool {
        let mut state = self.inner.lock();
        match state.children.get_mut(id) {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    async fn terminate(&self, id: &str, grace: Duration) -> Result<(), ProcessError> {
        let removed = self.inner.lock().children.remove(id);
        let Some(mut child) = removed else {
            return Ok(());
        };

        // EOF on stdin asks a persistent worker to exit
        drop(child.stdin.take());
        match wait_with_timeout(&mut child, grace, "worker exit").await {
            Ok(Some(status)) => {
                tracing::debug!(id, %status, "worker exited after stdin closed");
                return Ok(());
            }
            Ok(None) => {
                tracing::debug!(id, grace_ms = grace.as_millis() as u64, "grace elapsed, killing")
            }
            Err(e) => tracing::debug!(id, error = %e, "wait failed, killing"),
        }

        child
            .start_kill()
            .map_err(|e| ProcessError::TerminateFailed(format!("{}: {}", id, e)))?;
        match wait_with_timeout(&mut child, KILL_REAP_TIMEOUT, "worker kill").await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(ProcessError::TerminateFailed(format!(
                "{} did not exit within {}s of kill",
                id,
                KILL_REAP_TIMEOUT.as_secs()
            ))),
            Err(e) => Err(ProcessError::TerminateFailed(e)),
        }
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker handles.
//!
//! A [`WorkerHandle`] owns one worker process and the directory it runs in.
//! Plain workers run directly in the key's exec root; sandboxed workers get a
//! private directory with the worker files staged into it. Only
//! [`crate::WorkerFactory`] constructs or tears down handles.

use crate::sandbox;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wk_adapters::{ProcessAdapter, ProcessError, SpawnConfig};
use wk_core::{FilesHash, WorkerId, WorkerKey};

/// Lifecycle position of a handle. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkerState {
    Created,
    Prepared,
    Running,
    Destroyed,
}

#[derive(Debug)]
struct WorkerCore {
    id: WorkerId,
    key: WorkerKey,
    work_dir: PathBuf,
    log_path: PathBuf,
    files_hash: FilesHash,
    process_id: Option<String>,
    state: WorkerState,
}

/// A worker running directly in the exec root.
#[derive(Debug)]
pub struct PlainWorker {
    core: WorkerCore,
}

/// A worker running in its own directory with staged inputs.
#[derive(Debug)]
pub struct SandboxedWorker {
    core: WorkerCore,
}

/// One live worker process, exclusively owned by the pool or one borrower.
#[must_use = "a borrowed worker must be released or invalidated"]
#[derive(Debug)]
pub enum WorkerHandle {
    Plain(PlainWorker),
    Sandboxed(SandboxedWorker),
}

impl WorkerCore {
    fn new(id: WorkerId, key: WorkerKey, work_dir: PathBuf, log_path: PathBuf) -> Self {
        let files_hash = key.files_hash().clone();
        Self {
            id,
            key,
            work_dir,
            log_path,
            files_hash,
            process_id: None,
            state: WorkerState::Created,
        }
    }

    async fn start<P: ProcessAdapter>(&mut self, process: &P) -> Result<(), ProcessError> {
        let config = SpawnConfig {
            args: self.key.args().to_vec(),
            cwd: self.work_dir.clone(),
            env: self
                .key
                .env()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            log_path: self.log_path.clone(),
        };
        let id = process.spawn(&config).await?;
        self.process_id = Some(id);
        self.state = WorkerState::Running;
        Ok(())
    }

    fn is_alive<P: ProcessAdapter>(&self, process: &P) -> bool {
        match (&self.process_id, self.state) {
            (Some(id), WorkerState::Running) => process.is_alive(id),
            _ => false,
        }
    }

    async fn stop_process<P: ProcessAdapter>(&mut self, process: &P, grace: Duration) {
        if let Some(id) = self.process_id.take() {
            if let Err(e) = process.terminate(&id, grace).await {
                tracing::warn!(
                    worker = %self.id,
                    mnemonic = self.key.mnemonic(),
                    process_id = id.as_str(),
                    error = %e,
                    "worker did not terminate cleanly"
                );
            }
        }
        self.state = WorkerState::Destroyed;
    }
}

impl PlainWorker {
    fn prepare(&mut self) {
        self.core.state = WorkerState::Prepared;
    }
}

impl SandboxedWorker {
    async fn prepare(&mut self) -> io::Result<()> {
        let core = &mut self.core;
        sandbox::prepare_sandbox(&core.work_dir, core.key.exec_root(), core.key.worker_files())
            .await?;
        core.state = WorkerState::Prepared;
        Ok(())
    }

    async fn terminate<P: ProcessAdapter>(&mut self, process: &P, grace: Duration) {
        self.core.stop_process(process, grace).await;
        if let Err(e) = sandbox::remove_sandbox(&self.core.work_dir).await {
            tracing::warn!(
                worker = %self.core.id,
                work_dir = %self.core.work_dir.display(),
                error = %e,
                "failed to remove worker sandbox"
            );
        }
    }
}

impl WorkerHandle {
    pub(crate) fn plain(id: WorkerId, key: WorkerKey, log_path: PathBuf) -> Self {
        let work_dir = key.exec_root().to_path_buf();
        WorkerHandle::Plain(PlainWorker {
            core: WorkerCore::new(id, key, work_dir, log_path),
        })
    }

    pub(crate) fn sandboxed(
        id: WorkerId,
        key: WorkerKey,
        work_dir: PathBuf,
        log_path: PathBuf,
    ) -> Self {
        WorkerHandle::Sandboxed(SandboxedWorker {
            core: WorkerCore::new(id, key, work_dir, log_path),
        })
    }

    fn core(&self) -> &WorkerCore {
        match self {
            WorkerHandle::Plain(w) => &w.core,
            WorkerHandle::Sandboxed(w) => &w.core,
        }
    }

    fn core_mut(&mut self) -> &mut WorkerCore {
        match self {
            WorkerHandle::Plain(w) => &mut w.core,
            WorkerHandle::Sandboxed(w) => &mut w.core,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.core().id
    }

    pub fn key(&self) -> &WorkerKey {
        &self.core().key
    }

    pub fn mnemonic(&self) -> &str {
        self.core().key.mnemonic()
    }

    pub fn work_dir(&self) -> &Path {
        &self.core().work_dir
    }

    pub fn log_path(&self) -> &Path {
        &self.core().log_path
    }

    /// The files hash recorded when this worker was created.
    pub fn files_hash(&self) -> &FilesHash {
        &self.core().files_hash
    }

    pub fn is_sandboxed(&self) -> bool {
        matches!(self, WorkerHandle::Sandboxed(_))
    }

    pub fn state(&self) -> WorkerState {
        self.core().state
    }

    /// Adapter-level id of the running process.
    pub fn process_id(&self) -> Option<&str> {
        self.core().process_id.as_deref()
    }

    /// Non-blocking liveness probe.
    pub fn is_alive<P: ProcessAdapter>(&self, process: &P) -> bool {
        self.core().is_alive(process)
    }

    /// Set up the execution directory.
    pub(crate) async fn prepare(&mut self) -> io::Result<()> {
        match self {
            WorkerHandle::Plain(w) => {
                w.prepare();
                Ok(())
            }
            WorkerHandle::Sandboxed(w) => w.prepare().await,
        }
    }

    /// Spawn the worker process.
    pub(crate) async fn start<P: ProcessAdapter>(&mut self, process: &P) -> Result<(), ProcessError> {
        self.core_mut().start(process).await
    }

    /// Stop the process and release the sandbox. Never fails; safe to repeat.
    pub(crate) async fn terminate<P: ProcessAdapter>(&mut self, process: &P, grace: Duration) {
        match self {
            WorkerHandle::Plain(w) => w.core.stop_process(process, grace).await,
            WorkerHandle::Sandboxed(w) => w.terminate(process, grace).await,
        }
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker factory: creates, destroys, and validates worker handles.

use crate::config::WorkerOptions;
use crate::error::PoolError;
use crate::handle::WorkerHandle;
use crate::log_paths::{worker_log_path, worker_work_dir};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use wk_adapters::{EventSink, ProcessAdapter};
use wk_core::{WorkerIdGen, WorkerKey};

/// The only component that constructs or destroys [`WorkerHandle`]s.
///
/// Options and the reporter can be swapped between builds; handles created
/// earlier keep the sandboxing decision they were created with.
pub struct WorkerFactory<P> {
    process: P,
    worker_base_dir: PathBuf,
    ids: WorkerIdGen,
    options: RwLock<WorkerOptions>,
    reporter: RwLock<Option<Arc<dyn EventSink>>>,
}

impl<P: ProcessAdapter> WorkerFactory<P> {
    pub fn new(process: P, worker_base_dir: impl Into<PathBuf>, options: WorkerOptions) -> Self {
        Self {
            process,
            worker_base_dir: worker_base_dir.into(),
            ids: WorkerIdGen::new(),
            options: RwLock::new(options),
            reporter: RwLock::new(None),
        }
    }

    /// Draw worker ids from `ids` instead of a private counter.
    pub fn with_ids(mut self, ids: WorkerIdGen) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_reporter(self, reporter: Arc<dyn EventSink>) -> Self {
        self.set_reporter(Some(reporter));
        self
    }

    pub fn set_reporter(&self, reporter: Option<Arc<dyn EventSink>>) {
        *self.reporter.write() = reporter;
    }

    pub fn set_options(&self, options: WorkerOptions) {
        *self.options.write() = options;
    }

    pub fn options(&self) -> WorkerOptions {
        self.options.read().clone()
    }

    /// Create, prepare, and start a worker for `key`.
    ///
    /// On failure nothing is left behind: a sandbox that was already staged is
    /// removed before the error is returned, or when the returned future is
    /// dropped before it completes.
    pub async fn create(&self, key: &WorkerKey) -> Result<WorkerHandle, PoolError> {
        let options = self.options();
        let id = self.ids.next();
        let mnemonic = key.mnemonic();
        let log_path = worker_log_path(&self.worker_base_dir, id, mnemonic);

        let sandboxed = options.sandboxing || key.must_be_sandboxed();
        let mut handle = if sandboxed {
            let work_dir = worker_work_dir(&self.worker_base_dir, id, mnemonic);
            WorkerHandle::sandboxed(id, key.clone(), work_dir, log_path)
        } else {
            WorkerHandle::plain(id, key.clone(), log_path)
        };
        let mut staged = StagedSandbox::new(&handle);

        if let Err(source) = handle.prepare().await {
            tracing::error!(worker = %id, mnemonic, error = %source, "worker setup failed");
            handle.terminate(&self.process, options.terminate_grace()).await;
            return Err(PoolError::Setup {
                worker: id,
                mnemonic: mnemonic.to_string(),
                source,
            });
        }
        if let Err(source) = handle.start(&self.process).await {
            tracing::error!(worker = %id, mnemonic, error = %source, "worker spawn failed");
            handle.terminate(&self.process, options.terminate_grace()).await;
            return Err(PoolError::Spawn {
                worker: id,
                mnemonic: mnemonic.to_string(),
                source,
            });
        }

        tracing::info!(
            worker = %id,
            mnemonic,
            sandboxed,
            log = %handle.log_path().display(),
            "worker created"
        );
        if options.verbose {
            self.report_info(&format!(
                "Created new {} {} worker (id {}), logging to {}",
                if sandboxed { "sandboxed" } else { "non-sandboxed" },
                mnemonic,
                id,
                handle.log_path().display()
            ));
        }
        staged.disarm();
        Ok(handle)
    }

    /// Tear down a worker. Termination problems are logged, never returned.
    pub async fn destroy(&self, mut handle: WorkerHandle) {
        let options = self.options();
        if options.verbose {
            self.report_info(&format!(
                "Destroying {} worker (id {})",
                handle.mnemonic(),
                handle.id()
            ));
        }
        tracing::info!(worker = %handle.id(), mnemonic = handle.mnemonic(), "destroying worker");
        handle
            .terminate(&self.process, options.terminate_grace())
            .await;
    }

    /// A worker is valid for `key` while its files have not changed on disk.
    ///
    /// Liveness is not checked here; a dead worker surfaces to its borrower as
    /// a communication failure and is invalidated then.
    pub fn validate(&self, key: &WorkerKey, handle: &WorkerHandle) -> bool {
        let matches = key.files_hash() == handle.files_hash();
        if !matches {
            tracing::warn!(
                worker = %handle.id(),
                mnemonic = key.mnemonic(),
                old = %handle.files_hash(),
                new = %key.files_hash(),
                "worker files changed"
            );
            self.report_warn(&format!(
                "{} worker (id {}) can no longer be used, because its files have changed on disk [{} -> {}]",
                key.mnemonic(),
                handle.id(),
                handle.files_hash(),
                key.files_hash()
            ));
        }
        matches
    }

    pub fn is_alive(&self, handle: &WorkerHandle) -> bool {
        handle.is_alive(&self.process)
    }

    fn report_info(&self, message: &str) {
        if let Some(reporter) = self.reporter.read().as_ref() {
            reporter.info(message);
        }
    }

    fn report_warn(&self, message: &str) {
        if let Some(reporter) = self.reporter.read().as_ref() {
            reporter.warn(message);
        }
    }
}

/// Sandbox directory of a worker still being built. Removed if dropped armed.
struct StagedSandbox(Option<PathBuf>);

impl StagedSandbox {
    fn new(handle: &WorkerHandle) -> Self {
        Self(handle.is_sandboxed().then(|| handle.work_dir().to_path_buf()))
    }

    fn disarm(&mut self) {
        self.0 = None;
    }
}

impl Drop for StagedSandbox {
    fn drop(&mut self) {
        let Some(work_dir) = self.0.take() else {
            return;
        };
        match std::fs::remove_dir_all(&work_dir) {
            Ok(()) => {
                tracing::debug!(work_dir = %work_dir.display(), "removed abandoned worker sandbox")
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                work_dir = %work_dir.display(),
                error = %e,
                "failed to remove abandoned worker sandbox"
            ),
        }
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;

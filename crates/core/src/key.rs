// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker keys.
//!
//! A [`WorkerKey`] describes a class of interchangeable worker processes: two
//! equal keys produce behaviorally identical workers. The pool partitions its
//! bookkeeping by [`WorkerIdentity`], which is the key minus its files hash, so
//! that a key whose worker files changed lands in the same partition as the
//! stale workers it must evict.

use crate::FilesHash;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Immutable identity and configuration for a class of workers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkerKey {
    identity: WorkerIdentity,
    files_hash: FilesHash,
}

/// Everything about a [`WorkerKey`] except its files hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkerIdentity {
    mnemonic: String,
    exec_root: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    worker_files: Vec<PathBuf>,
    must_be_sandboxed: bool,
}

impl WorkerKey {
    /// Create a key for `args` (program followed by its arguments) run from `exec_root`.
    pub fn new(
        mnemonic: impl Into<String>,
        exec_root: impl Into<PathBuf>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            identity: WorkerIdentity {
                mnemonic: mnemonic.into(),
                exec_root: exec_root.into(),
                args: args.into_iter().map(Into::into).collect(),
                env: BTreeMap::new(),
                worker_files: Vec::new(),
                must_be_sandboxed: false,
            },
            files_hash: FilesHash::empty(),
        }
    }

    pub fn with_env(
        mut self,
        env: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        self.identity.env = env
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Set the files (relative to the exec root) that define the worker.
    ///
    /// Sorted and deduplicated so that equality does not depend on input order.
    pub fn with_worker_files(mut self, files: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        let mut files: Vec<PathBuf> = files.into_iter().map(Into::into).collect();
        files.sort();
        files.dedup();
        self.identity.worker_files = files;
        self
    }

    pub fn with_files_hash(mut self, hash: FilesHash) -> Self {
        self.files_hash = hash;
        self
    }

    pub fn sandboxed(mut self, must_be_sandboxed: bool) -> Self {
        self.identity.must_be_sandboxed = must_be_sandboxed;
        self
    }

    pub fn mnemonic(&self) -> &str {
        &self.identity.mnemonic
    }

    pub fn exec_root(&self) -> &Path {
        &self.identity.exec_root
    }

    pub fn args(&self) -> &[String] {
        &self.identity.args
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.identity.env
    }

    pub fn worker_files(&self) -> &[PathBuf] {
        &self.identity.worker_files
    }

    pub fn files_hash(&self) -> &FilesHash {
        &self.files_hash
    }

    pub fn must_be_sandboxed(&self) -> bool {
        self.identity.must_be_sandboxed
    }

    /// The pool partition this key belongs to.
    pub fn identity(&self) -> &WorkerIdentity {
        &self.identity
    }
}

impl WorkerIdentity {
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn exec_root(&self) -> &Path {
        &self.exec_root
    }
}

impl fmt::Display for WorkerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.identity.mnemonic, self.files_hash.short(12))
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;

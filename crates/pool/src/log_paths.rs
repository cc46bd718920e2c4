// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path builders for per-worker files under the worker base directory:
//!   `<base>/worker-<id>-<mnemonic>.log`
//!   `<base>/worker-<id>-<mnemonic>/`

use std::path::{Path, PathBuf};
use wk_core::WorkerId;

/// Build the path to a worker's log file.
///
/// Structure: `{base_dir}/worker-{id}-{mnemonic}.log`
pub fn worker_log_path(base_dir: &Path, id: WorkerId, mnemonic: &str) -> PathBuf {
    base_dir.join(format!("worker-{}-{}.log", id, mnemonic))
}

/// Build the path to a sandboxed worker's private execution directory.
///
/// Structure: `{base_dir}/worker-{id}-{mnemonic}/`
pub fn worker_work_dir(base_dir: &Path, id: WorkerId, mnemonic: &str) -> PathBuf {
    base_dir.join(format!("worker-{}-{}", id, mnemonic))
}

#[cfg(test)]
#[path = "log_paths_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{FilesHash, WorkerKey};

/// A non-sandboxed key for `mnemonic` with files hash `hash`.
pub fn test_key(mnemonic: &str, hash: &str) -> WorkerKey {
    WorkerKey::new(mnemonic, "/test/execroot", ["worker", "--persistent_worker"])
        .with_files_hash(FilesHash::from_hex(hash))
}

/// Same as [`test_key`] but rooted at `exec_root`.
pub fn test_key_at(mnemonic: &str, hash: &str, exec_root: &std::path::Path) -> WorkerKey {
    WorkerKey::new(mnemonic, exec_root, ["worker", "--persistent_worker"])
        .with_files_hash(FilesHash::from_hex(hash))
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content digest over the files that define a worker's behavior.

use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from computing a [`FilesHash`]
#[derive(Debug, Error)]
#[error("failed to hash worker file {}: {source}", path.display())]
pub struct DigestError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Lowercase-hex digest over a worker's defining files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FilesHash(String);

impl FilesHash {
    /// The hash of a worker with no tracked files.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Wrap an already computed hex digest.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Hash `files` (relative to `exec_root`).
    ///
    /// Each file contributes its relative path and the SHA-256 of its contents,
    /// in sorted path order, so the result is independent of the order given.
    pub fn compute(exec_root: &Path, files: &[PathBuf]) -> Result<Self, DigestError> {
        let mut sorted: Vec<&PathBuf> = files.iter().collect();
        sorted.sort();
        sorted.dedup();

        let mut hasher = Sha256::new();
        for rel in sorted {
            let abs = exec_root.join(rel);
            let contents = std::fs::read(&abs).map_err(|source| DigestError {
                path: abs.clone(),
                source,
            })?;
            hasher.update(rel.to_string_lossy().as_bytes());
            hasher.update([0u8]);
            hasher.update(Sha256::digest(&contents));
        }
        Ok(Self(format!("{:x}", hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the digest truncated to at most `n` characters.
    pub fn short(&self, n: usize) -> &str {
        match self.0.char_indices().nth(n) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FilesHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "digest_tests.rs"]
mod tests;

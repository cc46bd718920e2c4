// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the worker pool

use thiserror::Error;
use wk_adapters::ProcessError;
use wk_core::WorkerId;

/// Errors surfaced to callers of `acquire`
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to set up {mnemonic} worker (id {worker}): {source}")]
    Setup {
        worker: WorkerId,
        mnemonic: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start {mnemonic} worker (id {worker}): {source}")]
    Spawn {
        worker: WorkerId,
        mnemonic: String,
        #[source]
        source: ProcessError,
    },
    #[error("worker pool is closed")]
    Closed,
}

/// Errors from loading pool configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid pool config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("max instances for {0} must be at least 1")]
    ZeroCapacity(String),
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Keyed pool of persistent worker processes

pub mod config;
mod error;
mod factory;
mod handle;
pub mod log_paths;
mod pool;
pub mod sandbox;

#[cfg(test)]
mod test_helpers;

pub use config::{PoolConfig, WorkerOptions};
pub use error::{ConfigError, PoolError};
pub use factory::WorkerFactory;
pub use handle::{PlainWorker, SandboxedWorker, WorkerHandle, WorkerState};
pub use pool::{PartitionStats, WorkerPool};

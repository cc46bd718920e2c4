// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pool configuration.
//!
//! ```toml
//! worker_base_dir = "/out/_workers"
//!
//! [workers]
//! sandboxing = false
//! verbose = true
//! max_instances = 4
//! terminate_grace_ms = 2000
//!
//! [workers.max_instances_per_mnemonic]
//! Javac = 2
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wk_adapters::{env, subprocess::DEFAULT_TERMINATE_GRACE};

/// Options controlling how workers are created and how many may exist.
///
/// `max_instances` has no default; derive it from the build's configured concurrency.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerOptions {
    /// Sandbox every worker, regardless of its key
    #[serde(default)]
    pub sandboxing: bool,
    /// Report worker creation and destruction to the event sink
    #[serde(default)]
    pub verbose: bool,
    /// Maximum workers per key
    pub max_instances: usize,
    /// Per-mnemonic overrides of `max_instances`
    #[serde(default)]
    pub max_instances_per_mnemonic: BTreeMap<String, usize>,
    /// Time a worker gets to exit after its stdin closes before it is killed
    #[serde(default)]
    pub terminate_grace_ms: Option<u64>,
}

impl WorkerOptions {
    pub fn new(max_instances: usize) -> Self {
        Self {
            sandboxing: false,
            verbose: false,
            max_instances,
            max_instances_per_mnemonic: BTreeMap::new(),
            terminate_grace_ms: None,
        }
    }

    pub fn with_sandboxing(mut self, sandboxing: bool) -> Self {
        self.sandboxing = sandboxing;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_max_instances_for(mut self, mnemonic: impl Into<String>, max: usize) -> Self {
        self.max_instances_per_mnemonic.insert(mnemonic.into(), max);
        self
    }

    pub fn with_terminate_grace(mut self, grace: Duration) -> Self {
        self.terminate_grace_ms = Some(grace.as_millis() as u64);
        self
    }

    /// Capacity of the partition for `mnemonic` (never less than 1).
    pub fn max_instances_for(&self, mnemonic: &str) -> usize {
        self.max_instances_per_mnemonic
            .get(mnemonic)
            .copied()
            .unwrap_or(self.max_instances)
            .max(1)
    }

    /// Grace period: `WK_TERMINATE_GRACE_MS`, then config, then the default.
    pub fn terminate_grace(&self) -> Duration {
        env::terminate_grace_override()
            .or(self.terminate_grace_ms.map(Duration::from_millis))
            .unwrap_or(DEFAULT_TERMINATE_GRACE)
    }

    /// Reject zero capacities, which would block every acquire forever.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_instances == 0 {
            return Err(ConfigError::ZeroCapacity("all workers".to_string()));
        }
        if let Some((mnemonic, _)) = self
            .max_instances_per_mnemonic
            .iter()
            .find(|(_, max)| **max == 0)
        {
            return Err(ConfigError::ZeroCapacity(mnemonic.clone()));
        }
        Ok(())
    }
}

/// Top-level pool configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolConfig {
    /// Directory holding worker logs and sandboxes
    pub worker_base_dir: PathBuf,
    pub workers: WorkerOptions,
}

impl PoolConfig {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.workers.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

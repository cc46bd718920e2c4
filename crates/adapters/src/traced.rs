// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability

use crate::process::{ProcessAdapter, ProcessError, SpawnConfig};
use async_trait::async_trait;
use std::time::Duration;
use tracing::Instrument;

/// Wrapper that adds tracing to any ProcessAdapter
#[derive(Clone)]
pub struct TracedProcess<P> {
    inner: P,
}

impl<P> TracedProcess<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: ProcessAdapter> ProcessAdapter for TracedProcess<P> {
    async fn spawn(&self, config: &SpawnConfig) -> Result<String, ProcessError> {
        let program = config.args.first().map(String::as_str).unwrap_or_default();
        let span = tracing::info_span!(
            "process.spawn",
            program,
            cwd = %config.cwd.display(),
            log = %config.log_path.display()
        );
        async {
            tracing::info!(
                arg_count = config.args.len(),
                env_count = config.env.len(),
                "starting"
            );
            let start = std::time::Instant::now();
            let result = self.inner.spawn(config).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(id) => tracing::info!(process_id = id.as_str(), elapsed_ms, "process started"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "spawn failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    fn is_alive(&self, id: &str) -> bool {
        let alive = self.inner.is_alive(id);
        tracing::trace!(id, alive, "checked");
        alive
    }

    async fn terminate(&self, id: &str, grace: Duration) -> Result<(), ProcessError> {
        let span = tracing::info_span!("process.terminate", id, grace_ms = grace.as_millis() as u64);
        async {
            let start = std::time::Instant::now();
            let result = self.inner.terminate(id, grace).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "terminated"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "terminate failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;

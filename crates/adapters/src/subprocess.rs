// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess helpers

use std::process::ExitStatus;
use std::time::Duration;
use tokio::process::Child;

/// Default time a worker gets to exit on its own after stdin closes.
pub const DEFAULT_TERMINATE_GRACE: Duration = Duration::from_secs(5);

/// Time allowed for a killed worker to be reaped.
pub const KILL_REAP_TIMEOUT: Duration = Duration::from_secs(10);

/// Wait for `child` to exit, giving up after `timeout`.
///
/// Returns `Ok(None)` if the timeout elapsed with the child still running.
/// The child is left untouched in that case; the caller decides whether to kill it.
pub async fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
    description: &str,
) -> Result<Option<ExitStatus>, String> {
    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => Ok(Some(status)),
        Ok(Err(io_err)) => Err(format!("{} failed: {}", description, io_err)),
        Err(_elapsed) => Ok(None),
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;

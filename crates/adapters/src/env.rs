// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Override for the graceful shutdown window given to a worker before it is killed.
pub fn terminate_grace_override() -> Option<Duration> {
    parse_duration_ms("WK_TERMINATE_GRACE_MS")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;

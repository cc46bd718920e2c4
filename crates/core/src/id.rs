// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker id generation

use crate::WorkerId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic worker id counter.
///
/// Clones share the same counter, so a factory and anything it hands a clone
/// to draw from one sequence. Separate generators are fully independent.
#[derive(Clone, Debug)]
pub struct WorkerIdGen {
    counter: Arc<AtomicU64>,
}

impl WorkerIdGen {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Start the sequence at `first` (useful to keep ids distinct across runs in logs).
    pub fn starting_at(first: u64) -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(first)),
        }
    }

    /// Reserve the next id.
    pub fn next(&self) -> WorkerId {
        // u64 never wraps at process-spawn rates
        WorkerId(self.counter.fetch_add(1, Ordering::SeqCst))
    }

    /// Peek at the id the next call to [`WorkerIdGen::next`] would return.
    pub fn peek(&self) -> WorkerId {
        WorkerId(self.counter.load(Ordering::SeqCst))
    }
}

impl Default for WorkerIdGen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wk-core: Core types for the persistent worker pool

pub mod digest;
pub mod id;
pub mod key;
pub mod worker;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use digest::{DigestError, FilesHash};
pub use id::WorkerIdGen;
pub use key::{WorkerIdentity, WorkerKey};
pub use worker::WorkerId;

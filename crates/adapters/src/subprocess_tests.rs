// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tokio::process::Command;

#[tokio::test]
async fn wait_with_timeout_returns_status_on_exit() {
    let mut child = Command::new("true").spawn().unwrap();
    let status = wait_with_timeout(&mut child, Duration::from_secs(5), "true")
        .await
        .unwrap();
    assert!(status.unwrap().success());
}

#[tokio::test]
async fn wait_with_timeout_nonzero_exit_is_not_an_error() {
    let mut child = Command::new("false").spawn().unwrap();
    let status = wait_with_timeout(&mut child, Duration::from_secs(5), "false")
        .await
        .unwrap();
    assert!(!status.unwrap().success());
}

#[tokio::test]
async fn wait_with_timeout_elapsed_leaves_child_running() {
    let mut child = Command::new("sleep")
        .arg("10")
        .kill_on_drop(true)
        .spawn()
        .unwrap();
    let status = wait_with_timeout(&mut child, Duration::from_millis(100), "test sleep")
        .await
        .unwrap();
    assert!(status.is_none());
    assert!(child.try_wait().unwrap().is_none(), "child should still run");
    child.kill().await.unwrap();
}

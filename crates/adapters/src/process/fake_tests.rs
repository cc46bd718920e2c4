// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::PathBuf;

fn config() -> SpawnConfig {
    SpawnConfig {
        args: vec!["worker".to_string()],
        cwd: PathBuf::from("/exec"),
        env: vec![],
        log_path: PathBuf::from("/logs/worker-0.log"),
    }
}

#[tokio::test]
async fn fake_records_spawn_and_terminate() {
    let adapter = FakeProcessAdapter::new();
    let id = adapter.spawn(&config()).await.unwrap();

    assert!(adapter.is_alive(&id));
    adapter.terminate(&id, Duration::from_secs(1)).await.unwrap();
    assert!(!adapter.is_alive(&id));

    let process = adapter.get_process(&id).unwrap();
    assert_eq!(process.terminate_count, 1);
    assert_eq!(process.config.cwd, PathBuf::from("/exec"));

    let calls = adapter.calls();
    assert!(matches!(calls[0], ProcessCall::Spawn { .. }));
    assert!(matches!(calls[2], ProcessCall::Terminate { .. }));
}

#[tokio::test]
async fn fake_spawn_errors_are_consumed_in_order() {
    let adapter = FakeProcessAdapter::new();
    adapter.fail_next_spawn("no fork for you");

    let err = adapter.spawn(&config()).await.unwrap_err();
    assert!(err.to_string().contains("no fork for you"));
    assert_eq!(adapter.spawn_count(), 0);

    adapter.spawn(&config()).await.unwrap();
    assert_eq!(adapter.spawn_count(), 1);
    assert_eq!(adapter.live_count(), 1);
}

#[tokio::test]
async fn fake_set_exited_marks_dead() {
    let adapter = FakeProcessAdapter::new();
    let id = adapter.spawn(&config()).await.unwrap();
    adapter.set_exited(&id);
    assert!(!adapter.is_alive(&id));
    assert_eq!(adapter.get_process(&id).unwrap().terminate_count, 0);
}

#[tokio::test]
async fn fake_terminate_error_still_counts() {
    let adapter = FakeProcessAdapter::new();
    let id = adapter.spawn(&config()).await.unwrap();
    adapter.set_terminate_error("stuck in D state");

    let err = adapter.terminate(&id, Duration::ZERO).await.unwrap_err();
    assert!(matches!(err, ProcessError::TerminateFailed(_)));
    assert_eq!(adapter.get_process(&id).unwrap().terminate_count, 1);
}

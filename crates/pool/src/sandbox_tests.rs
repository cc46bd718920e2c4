// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use tempfile::tempdir;

fn exec_root_with(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    for (rel, contents) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    dir
}

#[tokio::test]
async fn prepare_stages_files_with_layout() {
    let exec_root = exec_root_with(&[("tools/javac.jar", "jar"), ("worker.params", "--x")]);
    let base = tempdir().unwrap();
    let work_dir = base.path().join("worker-0-Javac");

    prepare_sandbox(
        &work_dir,
        exec_root.path(),
        &[PathBuf::from("tools/javac.jar"), PathBuf::from("worker.params")],
    )
    .await
    .unwrap();

    assert!(work_dir.is_dir());
    assert_eq!(
        fs::read_to_string(work_dir.join("tools/javac.jar")).unwrap(),
        "jar"
    );
    assert_eq!(fs::read_to_string(work_dir.join("worker.params")).unwrap(), "--x");
}

#[cfg(unix)]
#[tokio::test]
async fn staged_files_are_symlinks_to_exec_root() {
    let exec_root = exec_root_with(&[("tool", "bin")]);
    let base = tempdir().unwrap();
    let work_dir = base.path().join("sandbox");

    prepare_sandbox(&work_dir, exec_root.path(), &[PathBuf::from("tool")])
        .await
        .unwrap();

    let meta = fs::symlink_metadata(work_dir.join("tool")).unwrap();
    assert!(meta.file_type().is_symlink());
    assert_eq!(
        fs::read_link(work_dir.join("tool")).unwrap(),
        exec_root.path().join("tool")
    );
}

#[tokio::test]
async fn prepare_twice_replaces_staged_files() {
    let exec_root = exec_root_with(&[("tool", "bin")]);
    let base = tempdir().unwrap();
    let work_dir = base.path().join("sandbox");
    let files = [PathBuf::from("tool")];

    prepare_sandbox(&work_dir, exec_root.path(), &files).await.unwrap();
    prepare_sandbox(&work_dir, exec_root.path(), &files).await.unwrap();
    assert_eq!(fs::read_to_string(work_dir.join("tool")).unwrap(), "bin");
}

#[tokio::test]
async fn missing_source_is_not_found() {
    let exec_root = exec_root_with(&[]);
    let base = tempdir().unwrap();

    let err = prepare_sandbox(
        &base.path().join("sandbox"),
        exec_root.path(),
        &[PathBuf::from("missing.jar")],
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
    assert!(err.to_string().contains("missing.jar"));
}

#[yare::parameterized(
    parent   = { "../outside" },
    nested   = { "tools/../../outside" },
    absolute = { "/etc/passwd" },
    empty    = { "" },
)]
fn escaping_paths_are_rejected(rel: &str) {
    let exec_root = exec_root_with(&[]);
    let base = tempdir().unwrap();
    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(prepare_sandbox(
            &base.path().join("sandbox"),
            exec_root.path(),
            &[PathBuf::from(rel)],
        ));
    assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidInput);
}

#[tokio::test]
async fn prepare_fails_when_work_dir_is_a_file() {
    let exec_root = exec_root_with(&[]);
    let base = tempdir().unwrap();
    let blocker = base.path().join("sandbox");
    fs::write(&blocker, "file").unwrap();

    assert!(prepare_sandbox(&blocker, exec_root.path(), &[]).await.is_err());
}

#[tokio::test]
async fn remove_sandbox_is_idempotent() {
    let base = tempdir().unwrap();
    let work_dir = base.path().join("sandbox");
    fs::create_dir_all(work_dir.join("nested")).unwrap();

    remove_sandbox(&work_dir).await.unwrap();
    assert!(!path_exists(&work_dir).await);
    remove_sandbox(&work_dir).await.unwrap();
}

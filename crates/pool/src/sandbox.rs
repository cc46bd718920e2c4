// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sandbox directory preparation for isolated workers

use std::io;
use std::path::{Component, Path, PathBuf};

/// Create `work_dir` and stage each of `files` (relative to `exec_root`) into it.
///
/// Files keep their relative layout inside the sandbox. Anything already at a
/// staged path is replaced.
pub async fn prepare_sandbox(work_dir: &Path, exec_root: &Path, files: &[PathBuf]) -> io::Result<()> {
    tokio::fs::create_dir_all(work_dir).await?;
    for rel in files {
        check_relative(rel)?;
        stage_file(&exec_root.join(rel), &work_dir.join(rel)).await?;
    }
    Ok(())
}

/// Make `src` visible at `dst`: a symlink on unix, a copy elsewhere.
pub async fn stage_file(src: &Path, dst: &Path) -> io::Result<()> {
    if !path_exists(src).await {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("worker file {} does not exist", src.display()),
        ));
    }
    if let Some(parent) = dst.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    match tokio::fs::symlink_metadata(dst).await {
        Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(dst).await?,
        Ok(_) => tokio::fs::remove_file(dst).await?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    #[cfg(unix)]
    {
        tokio::fs::symlink(src, dst).await
    }
    #[cfg(not(unix))]
    {
        tokio::fs::copy(src, dst).await.map(|_| ())
    }
}

pub async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Remove a sandbox directory. A directory that is already gone is not an error.
pub async fn remove_sandbox(work_dir: &Path) -> io::Result<()> {
    match tokio::fs::remove_dir_all(work_dir).await {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Staged paths must stay inside the sandbox.
fn check_relative(rel: &Path) -> io::Result<()> {
    let escapes = rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || rel.as_os_str().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("worker file {} is not a relative path inside the exec root", rel.display()),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "sandbox_tests.rs"]
mod tests;

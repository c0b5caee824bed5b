//! Atomic I/O operations
//!
//! Every mutation of a config file goes through [`write_atomic`]: content is
//! staged in a sibling temp file and committed with a single rename, so the
//! target is only ever observed in its old or its new state.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Write content atomically to a file.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Missing parent directories are created.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    write_atomic_with_hook(path, content, |_| Ok(()))
}

/// Like [`write_atomic`], but runs `before_commit` once the temp file is
/// durable and before it is renamed onto `path`.
///
/// An error from the hook aborts the commit the same way a failed write
/// does: the temp file is removed, parent directories created by this call
/// are removed again and `path` is left untouched.
pub fn write_atomic_with_hook<F>(path: &Path, content: &[u8], before_commit: F) -> Result<()>
where
    F: FnOnce(&Path) -> std::io::Result<()>,
{
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());

    // Ensure parent directory exists, remembering the topmost one created
    let created = parent.and_then(topmost_missing_dir);
    if let Some(parent) = parent {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_path = temp_path_for(path);
    let result = stage_and_commit(path, &temp_path, content, before_commit);
    if result.is_err() {
        discard_temp(&temp_path);
        if let (Some(parent), Some(top)) = (parent, created.as_deref()) {
            discard_created_dirs(parent, top);
        }
    }
    result
}

/// Highest ancestor of `dir` (or `dir` itself) that does not exist yet.
fn topmost_missing_dir(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .take_while(|a| !a.as_os_str().is_empty() && !a.exists())
        .last()
        .map(Path::to_path_buf)
}

/// Remove the now-empty directories from `parent` up to and including `top`.
fn discard_created_dirs(parent: &Path, top: &Path) {
    for dir in parent.ancestors() {
        if let Err(e) = fs::remove_dir(dir) {
            tracing::warn!(path = %dir.display(), error = %e, "Failed to remove created directory");
            return;
        }
        if dir == top {
            return;
        }
    }
}

fn stage_and_commit<F>(path: &Path, temp_path: &Path, content: &[u8], before_commit: F) -> Result<()>
where
    F: FnOnce(&Path) -> std::io::Result<()>,
{
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;

    // Flush to disk before the rename makes it visible
    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    drop(temp_file);

    before_commit(temp_path).map_err(|e| Error::io(temp_path, e))?;

    // Atomic rename
    fs::rename(temp_path, path).map_err(|e| Error::io(path, e))?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "Committed atomic write");
    Ok(())
}

/// Sibling temp path: `.<file>.<pid>.<unix-nanos>.tmp`.
///
/// Same directory as the target so the rename never crosses filesystems.
fn temp_path_for(path: &Path) -> PathBuf {
    let stamp = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default();
    let temp_name = format!(
        ".{}.{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id(),
        stamp
    );
    path.with_file_name(temp_name)
}

fn discard_temp(temp_path: &Path) {
    match fs::remove_file(temp_path) {
        Ok(()) => tracing::debug!(path = %temp_path.display(), "Removed temp file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %temp_path.display(),
            error = %e,
            "Failed to remove temp file"
        ),
    }
}

/// Read text content from a file, mapping a missing file to `None`.
pub fn read_text_if_exists(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Remove a file. Returns `false` when there was nothing to remove.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

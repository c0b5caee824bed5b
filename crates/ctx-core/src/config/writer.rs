//! Validated, atomic persistence of config files

use std::path::Path;

use ctx_fs::io;
use serde_json::Value;

use super::merge::merge;
use super::store::{ConfigStore, LoadOutcome};
use crate::context::{Context, ContextPatch};
use crate::validate;
use crate::{Error, Result};

/// How an update combines with what is already on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Merge the update onto the existing file
    #[default]
    Merge,
    /// Discard the existing file's content
    Replace,
}

/// Writes config files.
///
/// Updates are validated before the filesystem is touched and committed via
/// temp-file-then-rename, so the target is either fully updated or left
/// byte-for-byte as it was.
///
/// There is no cross-process locking: two concurrent merge writes to the
/// same file resolve as last-rename-wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigWriter {
    store: ConfigStore,
}

impl ConfigWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `update` to `path` and return the committed context.
    pub fn write(&self, path: &Path, update: &ContextPatch, mode: WriteMode) -> Result<Context> {
        self.write_with_hook(path, update, mode, |_| Ok(()))
    }

    /// Validate a raw JSON update (`null` deletes a key) and write it.
    pub fn write_json(&self, path: &Path, update: &Value, mode: WriteMode) -> Result<Context> {
        let patch = validate::validate_patch(update)?;
        self.write(path, &patch, mode)
    }

    /// [`ConfigWriter::write`] with a hook run between staging the temp file
    /// and renaming it onto `path`. An error from the hook aborts the commit.
    pub fn write_with_hook<F>(
        &self,
        path: &Path,
        update: &ContextPatch,
        mode: WriteMode,
        before_commit: F,
    ) -> Result<Context>
    where
        F: FnOnce(&Path) -> std::io::Result<()>,
    {
        validate::check_patch(update)?;

        let base = match mode {
            WriteMode::Replace => Context::default(),
            WriteMode::Merge => match self.store.probe(path) {
                LoadOutcome::Present(existing) => existing,
                LoadOutcome::Absent => Context::default(),
                LoadOutcome::Corrupt { reason } => {
                    tracing::warn!(
                        "Existing config at {} is invalid, replacing it: {}",
                        path.display(),
                        reason
                    );
                    Context::default()
                }
            },
        };

        let merged = merge(&base, update);
        let content = merged.to_json_pretty()?;

        io::write_atomic_with_hook(path, content.as_bytes(), before_commit).map_err(|source| {
            Error::Write {
                path: path.to_path_buf(),
                source,
            }
        })?;

        tracing::debug!(path = %path.display(), ?mode, "Wrote config");
        Ok(merged)
    }

    /// Delete the config file at `path`.
    ///
    /// Returns `false` if there was no file.
    pub fn clear(&self, path: &Path) -> Result<bool> {
        let removed = io::remove_if_exists(path).map_err(|source| Error::Clear {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), removed, "Cleared config");
        Ok(removed)
    }
}

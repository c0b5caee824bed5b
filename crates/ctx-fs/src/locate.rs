//! Upward discovery of project-scoped config files

use std::path::{Path, PathBuf};

use crate::CtxPath;

/// Find the nearest project-local config file, starting at `start`.
///
/// Looks for `.ctx/config.json` in `start` and each of its ancestors.
pub fn find_local_config(start: &Path) -> Option<PathBuf> {
    find_upward(start, CtxPath::relative_config())
}

/// Walk from `start` toward the filesystem root, returning the first
/// `<dir>/<relative>` that is a file.
pub fn find_upward(start: &Path, relative: impl AsRef<Path>) -> Option<PathBuf> {
    find_upward_with(start, relative, |candidate| candidate.is_file())
}

/// [`find_upward`] with a caller-supplied existence probe.
///
/// A relative `start` is resolved against the current directory first. The
/// probe is called once per visited directory, so a walk from a path of
/// depth `d` makes at most `d + 1` calls.
pub fn find_upward_with<F>(start: &Path, relative: impl AsRef<Path>, mut probe: F) -> Option<PathBuf>
where
    F: FnMut(&Path) -> bool,
{
    let relative = relative.as_ref();
    // A relative start has no real parents to climb to
    let start = std::path::absolute(start).unwrap_or_else(|_| start.to_path_buf());
    let mut current = Some(start.as_path());

    while let Some(dir) = current {
        let candidate = dir.join(relative);
        if probe(&candidate) {
            tracing::debug!(path = %candidate.display(), "Found project config");
            return Some(candidate);
        }
        // Path::parent yields None once the root is reached
        current = dir.parent();
    }

    tracing::debug!(start = %start.display(), "No project config found");
    None
}

//! Locations of the global and project-local config files

use std::path::{Path, PathBuf};

use ctx_fs::locate::find_upward_with;
use ctx_fs::{CtxPath, GLOBAL_CONFIG_ENV};

use crate::{Error, Result};

/// Name of the per-user directory under the platform config dir.
const APP_DIR: &str = "ctx";

/// The explicitly addressed config resources.
///
/// The global file has one fixed path; the project-local file is discovered
/// relative to a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    global: PathBuf,
}

impl ConfigPaths {
    pub fn new(global: impl Into<PathBuf>) -> Self {
        Self {
            global: global.into(),
        }
    }

    /// Determine the global config path.
    ///
    /// Uses `$CTX_GLOBAL_CONFIG` when set and non-empty, otherwise the
    /// platform-appropriate config directory:
    /// - Linux: `~/.config/ctx/config.json`
    /// - macOS: `~/Library/Application Support/ctx/config.json`
    /// - Windows: `%APPDATA%\ctx\config.json`
    pub fn from_env() -> Result<Self> {
        if let Some(path) = std::env::var_os(GLOBAL_CONFIG_ENV).filter(|v| !v.is_empty()) {
            tracing::debug!(?path, "Using global config from {}", GLOBAL_CONFIG_ENV);
            return Ok(Self::new(path));
        }

        let config_dir = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .ok_or(Error::HomeNotFound)?;
        Ok(Self::new(
            config_dir.join(APP_DIR).join(CtxPath::ConfigFile.as_str()),
        ))
    }

    pub fn global(&self) -> &Path {
        &self.global
    }

    /// Nearest existing project-local config at or above `cwd`.
    ///
    /// The global file is never reported as project-local. When it sits on
    /// the search path the walk steps over it and keeps climbing.
    pub fn find_local(&self, cwd: &Path) -> Option<PathBuf> {
        find_upward_with(cwd, CtxPath::relative_config(), |candidate| {
            candidate.is_file() && candidate != self.global
        })
    }

    /// Where a project-local write from `cwd` lands: the existing local file
    /// if one is found, otherwise `<cwd>/.ctx/config.json`.
    pub fn local_target(&self, cwd: &Path) -> PathBuf {
        self.find_local(cwd)
            .unwrap_or_else(|| cwd.join(CtxPath::relative_config()))
    }
}

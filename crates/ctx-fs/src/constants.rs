//! Well-known names for ctx configuration on disk.

use std::path::{Path, PathBuf};

/// Environment variable that replaces the global config file path.
///
/// Holds a full file path. Used to isolate tests from the real home directory.
pub const GLOBAL_CONFIG_ENV: &str = "CTX_GLOBAL_CONFIG";

/// Standard ctx filesystem markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtxPath {
    /// The `.ctx` directory at a project root
    ConfigDir,
    /// The `config.json` file inside [`CtxPath::ConfigDir`]
    ConfigFile,
}

impl CtxPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigDir => ".ctx",
            Self::ConfigFile => "config.json",
        }
    }

    /// Config file location relative to a project directory:
    /// `.ctx/config.json`.
    pub fn relative_config() -> PathBuf {
        Path::new(Self::ConfigDir.as_str()).join(Self::ConfigFile.as_str())
    }
}

impl AsRef<Path> for CtxPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for CtxPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for CtxPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Fail-open loading of a single config file

use std::path::Path;

use ctx_fs::io;
use serde_json::Value;

use crate::context::Context;
use crate::validate;

/// What was found at a config path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A readable, schema-conformant file
    Present(Context),
    /// No file at the path
    Absent,
    /// A file that could not be read, parsed or validated
    Corrupt { reason: String },
}

impl LoadOutcome {
    /// Collapse to a context; anything but `Present` is empty.
    pub fn into_context(self) -> Context {
        match self {
            Self::Present(context) => context,
            Self::Absent | Self::Corrupt { .. } => Context::default(),
        }
    }
}

/// Loads config files, degrading to "no value set" on any problem.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Inspect the file at `path` without collapsing failures.
    pub fn probe(&self, path: &Path) -> LoadOutcome {
        let content = match io::read_text_if_exists(path) {
            Ok(Some(content)) => content,
            Ok(None) => return LoadOutcome::Absent,
            Err(e) => {
                return LoadOutcome::Corrupt {
                    reason: e.to_string(),
                };
            }
        };

        let value: Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                return LoadOutcome::Corrupt {
                    reason: format!("invalid JSON: {}", e),
                };
            }
        };

        match validate::validate(&value) {
            Ok(context) => LoadOutcome::Present(context),
            Err(errors) => LoadOutcome::Corrupt {
                reason: format!("schema violations:\n{}", errors),
            },
        }
    }

    /// Load the context at `path`.
    ///
    /// Missing files are empty. Corrupt files are reported with a warning and
    /// are also empty: a broken config must never stop the tool from running.
    pub fn load(&self, path: &Path) -> Context {
        match self.probe(path) {
            LoadOutcome::Present(context) => context,
            LoadOutcome::Absent => {
                tracing::debug!(path = %path.display(), "No config file");
                Context::default()
            }
            LoadOutcome::Corrupt { reason } => {
                tracing::warn!(
                    "Ignoring invalid config at {}: {}",
                    path.display(),
                    reason
                );
                Context::default()
            }
        }
    }
}

//! Context resolution with layered precedence
//!
//! The `ContextResolver` loads the global and project-local config files,
//! layers caller overrides on top and backfills from the active app.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use super::merge::merge;
use super::paths::ConfigPaths;
use super::store::ConfigStore;
use crate::context::{Context, ContextPatch, Field, Patch};

/// Where a configuration value came from, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigSource {
    Global,
    ProjectLocal,
    Environment,
    CommandLine,
}

impl ConfigSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::ProjectLocal => "project-local",
            Self::Environment => "environment",
            Self::CommandLine => "command-line",
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance of a resolved field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Supplied directly by a source
    Source(ConfigSource),
    /// Copied from the resolved `activeApp`
    ActiveApp,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(source) => write!(f, "{}", source),
            Self::ActiveApp => f.write_str("active-app"),
        }
    }
}

/// Caller-supplied layers applied above the config files.
///
/// Layers are kept in [`ConfigSource`] order regardless of insertion order;
/// layers with the same source apply in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    layers: Vec<(ConfigSource, ContextPatch)>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single command-line layer.
    pub fn explicit(patch: ContextPatch) -> Self {
        Self::new().with_layer(ConfigSource::CommandLine, patch)
    }

    pub fn with_layer(mut self, source: ConfigSource, patch: ContextPatch) -> Self {
        self.layers.push((source, patch));
        self.layers.sort_by_key(|(source, _)| *source);
        self
    }

    pub fn layers(&self) -> &[(ConfigSource, ContextPatch)] {
        &self.layers
    }
}

/// A resolved context together with where each field came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub context: Context,
    pub origins: BTreeMap<Field, Origin>,
}

impl Resolution {
    fn apply(&mut self, source: ConfigSource, patch: &ContextPatch) {
        self.context = merge(&self.context, patch);
        for field in Field::ALL {
            match patch.shape(field) {
                Patch::Keep => {}
                Patch::Clear => {
                    self.origins.remove(&field);
                }
                Patch::Set(()) => {
                    self.origins.insert(field, Origin::Source(source));
                }
            }
        }
    }

    /// Fill `account`, `team` and `moniker` from `activeApp` where unset.
    fn backfill_active_app(&mut self) {
        let Some(app) = self.context.active_app.clone() else {
            return;
        };

        let slots = [
            (Field::Account, &mut self.context.account, app.account),
            (Field::Team, &mut self.context.team, app.team),
            (Field::Moniker, &mut self.context.moniker, app.moniker),
        ];
        for (field, slot, value) in slots {
            if slot.is_none() {
                *slot = Some(value);
                self.origins.insert(field, Origin::ActiveApp);
            }
        }
    }
}

/// Resolves the effective context for one invocation.
///
/// Resolution is stateless and never fails: unreadable sources contribute
/// nothing and the worst case is an empty context.
pub struct ContextResolver {
    paths: ConfigPaths,
    cwd: PathBuf,
    store: ConfigStore,
}

impl ContextResolver {
    /// Create a resolver searching for project-local config from `cwd`.
    pub fn new(paths: ConfigPaths, cwd: impl Into<PathBuf>) -> Self {
        Self {
            paths,
            cwd: cwd.into(),
            store: ConfigStore::new(),
        }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Path of the project-local config in effect, if any.
    pub fn local_path(&self) -> Option<PathBuf> {
        self.paths.find_local(&self.cwd)
    }

    /// Resolve with `overrides` as the highest-precedence layer.
    ///
    /// Precedence: empty defaults < global < project-local < overrides,
    /// then active-app backfill.
    pub fn resolve(&self, overrides: &ContextPatch) -> Context {
        self.resolve_traced(&Overrides::explicit(overrides.clone()))
            .context
    }

    /// Resolve and record which source supplied each field.
    pub fn resolve_traced(&self, overrides: &Overrides) -> Resolution {
        let mut resolution = Resolution::default();

        // Layer 1 - Global config
        let global_path = self.paths.global();
        tracing::debug!(path = %global_path.display(), "Loading global config (layer 1)");
        let global = self.store.load(global_path);
        resolution.apply(ConfigSource::Global, &global.into_patch());

        // Layer 2 - Project-local config
        match self.local_path() {
            Some(local_path) => {
                tracing::debug!(path = %local_path.display(), "Loading project config (layer 2)");
                let local = self.store.load(&local_path);
                resolution.apply(ConfigSource::ProjectLocal, &local.into_patch());
            }
            None => {
                tracing::debug!(cwd = %self.cwd.display(), "No project config found (layer 2) - skipping");
            }
        }

        // Layers 3+ - Environment and command line
        for (source, patch) in overrides.layers() {
            resolution.apply(*source, patch);
        }

        resolution.backfill_active_app();
        resolution
    }
}

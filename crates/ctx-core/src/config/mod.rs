//! Configuration persistence and resolution
//!
//! # Configuration Hierarchy
//!
//! The effective context is built from these sources (later sources override
//! earlier):
//!
//! 1. **Global config** - `<config_dir>/ctx/config.json`, or `$CTX_GLOBAL_CONFIG`
//! 2. **Project-local config** - nearest `.ctx/config.json` above the working directory
//! 3. **Environment** - `CTX_ACCOUNT`, `CTX_TEAM`, ... supplied by the caller
//! 4. **Command line** - explicit flags supplied by the caller
//!
//! After layering, an `activeApp` entry fills in `account`, `team` and
//! `moniker` when they are still unset.
//!
//! Reads never fail: a missing or corrupt file counts as empty. Writes are
//! validated up front and committed atomically, so a rejected or failed
//! write leaves the file exactly as it was.

mod merge;
mod paths;
mod resolver;
mod store;
mod writer;

pub use merge::merge;
pub use paths::ConfigPaths;
pub use resolver::{ConfigSource, ContextResolver, Origin, Overrides, Resolution};
pub use store::{ConfigStore, LoadOutcome};
pub use writer::{ConfigWriter, WriteMode};

//! Core context handling for ctx
//!
//! This crate owns the small configuration context (account, team, moniker,
//! provider, region and the active application) that every ctx command
//! starts from:
//!
//! - **Model**: a closed, typed [`Context`] plus [`ContextPatch`] overlays
//!   that can keep, clear or set each field
//! - **Validation**: field rules applied to raw JSON and typed updates
//! - **Persistence**: fail-open loading and atomic merge-or-replace writes
//! - **Resolution**: global < project-local < environment < command line,
//!   followed by active-app backfill
//!
//! # Architecture
//!
//! ```text
//!                  ctx-cli
//!                     |
//!                  ctx-core
//!                     |
//!                   ctx-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use ctx_core::{ConfigPaths, ContextPatch, ContextResolver};
//!
//! fn example() -> ctx_core::Result<()> {
//!     let paths = ConfigPaths::from_env()?;
//!     let resolver = ContextResolver::new(paths, "/work/billing-api");
//!     let context = resolver.resolve(&ContextPatch::new().with_region("eu-west-1"));
//!     let target = context.require_target()?;
//!     println!("deploying {} to {}", target.moniker, target.region);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod validate;

pub use config::{
    ConfigPaths, ConfigSource, ConfigStore, ConfigWriter, ContextResolver, LoadOutcome, Origin,
    Overrides, Resolution, WriteMode, merge,
};
pub use context::{ActiveApp, Context, ContextPatch, DeployTarget, Field, Patch, Provider};
pub use error::{Error, Result};
pub use validate::{ValidationErrors, Violation};

//! Filesystem primitives for ctx
//!
//! Provides crash-safe atomic writes and upward discovery of
//! project-scoped configuration files.

pub mod constants;
pub mod error;
pub mod io;
pub mod locate;

pub use constants::{CtxPath, GLOBAL_CONFIG_ENV};
pub use error::{Error, Result};
pub use locate::{find_local_config, find_upward};

//! Command implementations for ctx-cli

pub mod app;
pub mod config;
pub mod target;

pub use app::{run_app_clear, run_app_show, run_app_use};
pub use config::{run_config_clear, run_config_path, run_config_set, run_config_show, run_config_unset};
pub use target::run_target;

use crate::cli::Scope;

/// Human label for a write scope.
pub(crate) fn scope_label(scope: Scope) -> &'static str {
    match scope {
        Scope::Global => "global",
        Scope::Local => "project-local",
    }
}

//! Error types for ctx-core

use std::path::PathBuf;

use crate::context::Field;
use crate::validate::ValidationErrors;

/// Result type for ctx-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ctx-core operations
///
/// Only the write path and downstream requirement checks produce these;
/// reading configuration never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more fields failed schema validation
    #[error("Invalid configuration:\n{0}")]
    Validation(ValidationErrors),

    /// The atomic write of a config file failed; the target is unchanged
    #[error("Failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: ctx_fs::Error,
    },

    /// Removing a config file failed
    #[error("Failed to clear config at {path}: {source}")]
    Clear {
        path: PathBuf,
        #[source]
        source: ctx_fs::Error,
    },

    /// A downstream operation needs fields the resolved context lacks
    #[error("{}", missing_fields_message(.fields))]
    MissingFields { fields: Vec<Field> },

    /// Neither the override variable nor a home directory is available
    #[error("Could not locate the global config: no home directory and {} is not set", ctx_fs::GLOBAL_CONFIG_ENV)]
    HomeNotFound,

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

fn missing_fields_message(fields: &[Field]) -> String {
    let names: Vec<&str> = fields.iter().map(|f| f.key()).collect();
    let flags: Vec<String> = fields
        .iter()
        .map(|f| format!("--{} <value>", f.key()))
        .collect();
    let env_vars: Vec<String> = fields.iter().map(|f| f.env_var()).collect();

    format!(
        "Missing required context: {names}\n  \
         Persist it with `ctx config set --global {flags}` (or --local for this project), or\n  \
         supply it for this invocation only with `{flags}` or {env}",
        names = names.join(", "),
        flags = flags.join(" "),
        env = env_vars.join(" / "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_message_names_every_field_and_both_remedies() {
        let err = Error::MissingFields {
            fields: vec![Field::Account, Field::Region],
        };
        let message = err.to_string();

        assert!(message.contains("account, region"));
        assert!(message.contains("ctx config set --global --account <value> --region <value>"));
        assert!(message.contains("CTX_ACCOUNT / CTX_REGION"));
    }
}

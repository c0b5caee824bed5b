//! Per-invocation state shared by all commands
//!
//! Collects the config locations, the working directory and the override
//! layers (environment, then command line) once, before dispatch.

use std::path::PathBuf;

use ctx_core::validate::validate_patch;
use ctx_core::{ConfigPaths, ConfigSource, ContextPatch, ContextResolver, Field, Overrides};
use serde_json::{Map, Value};

use crate::cli::{ContextArgs, Scope};
use crate::error::{CliError, Result};

/// Everything a command needs to read or write context.
#[derive(Debug, Clone)]
pub struct Session {
    pub cwd: PathBuf,
    pub paths: ConfigPaths,
    pub overrides: Overrides,
}

impl Session {
    /// Build a session from the process environment and parsed flags.
    pub fn from_env(flags: &ContextArgs) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let paths = ConfigPaths::from_env()?;
        let env = env_overrides(|name| std::env::var(name).ok())?;
        let cli = flag_overrides(flags)?;
        Ok(Self::new(cwd, paths, env, cli))
    }

    pub fn new(cwd: PathBuf, paths: ConfigPaths, env: ContextPatch, cli: ContextPatch) -> Self {
        let overrides = Overrides::new()
            .with_layer(ConfigSource::Environment, env)
            .with_layer(ConfigSource::CommandLine, cli);
        Self {
            cwd,
            paths,
            overrides,
        }
    }

    pub fn resolver(&self) -> ContextResolver {
        ContextResolver::new(self.paths.clone(), &self.cwd)
    }

    /// File a write with the given scope lands in.
    pub fn target_path(&self, scope: Scope) -> PathBuf {
        match scope {
            Scope::Global => self.paths.global().to_path_buf(),
            Scope::Local => self.paths.local_target(&self.cwd),
        }
    }
}

/// Environment layer from `CTX_ACCOUNT`, `CTX_TEAM`, `CTX_MONIKER`,
/// `CTX_PROVIDER` and `CTX_REGION`. Empty variables are ignored.
pub fn env_overrides<F>(lookup: F) -> Result<ContextPatch>
where
    F: Fn(&str) -> Option<String>,
{
    let map: Map<String, Value> = Field::TARGET
        .into_iter()
        .filter_map(|field| {
            lookup(&field.env_var())
                .filter(|v| !v.is_empty())
                .map(|v| (field.key().to_string(), Value::String(v)))
        })
        .collect();

    validate_patch(&Value::Object(map)).map_err(|errors| {
        CliError::user(format!("Invalid context in environment variables:\n{}", errors))
    })
}

/// Command-line layer from the top-level override flags.
pub fn flag_overrides(flags: &ContextArgs) -> Result<ContextPatch> {
    validate_patch(&flags.to_json())
        .map_err(|errors| CliError::user(format!("Invalid context flags:\n{}", errors)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctx_core::Provider;
    use std::collections::HashMap;

    #[test]
    fn env_overrides_reads_known_variables() {
        let vars: HashMap<&str, &str> = [
            ("CTX_ACCOUNT", "a1"),
            ("CTX_PROVIDER", "azure"),
            ("CTX_REGION", ""),
            ("CTX_UNRELATED", "x"),
        ]
        .into_iter()
        .collect();

        let patch = env_overrides(|name| vars.get(name).map(|v| v.to_string())).unwrap();

        assert_eq!(
            patch,
            ContextPatch::new()
                .with_account("a1")
                .with_provider(Provider::Azure)
        );
    }

    #[test]
    fn env_overrides_rejects_invalid_values() {
        let result = env_overrides(|name| (name == "CTX_MONIKER").then(|| "Bad Name".to_string()));

        let message = result.unwrap_err().to_string();
        assert!(message.contains("moniker"), "got: {}", message);
    }

    #[test]
    fn flag_overrides_validates_provider() {
        let flags = ContextArgs {
            provider: Some("bogus".into()),
            ..ContextArgs::default()
        };

        assert!(flag_overrides(&flags).is_err());
    }
}

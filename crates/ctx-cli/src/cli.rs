//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use ctx_core::Field;
use serde_json::{Map, Value};

/// ctx - Manage the default account, team, app and region for cloud commands
#[derive(Parser, Debug)]
#[command(name = "ctx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    // Overrides for this invocation only; CTX_<FIELD> variables sit below these
    #[command(flatten)]
    pub overrides: ContextArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Values for the scalar context fields.
///
/// Kept as raw strings so every value goes through schema validation.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextArgs {
    /// Cloud account
    #[arg(long)]
    pub account: Option<String>,

    /// Team
    #[arg(long)]
    pub team: Option<String>,

    /// Application moniker (lowercase letters, digits and hyphens)
    #[arg(long)]
    pub moniker: Option<String>,

    /// Cloud provider: aws, azure or mock
    #[arg(long)]
    pub provider: Option<String>,

    /// Cloud region
    #[arg(long)]
    pub region: Option<String>,
}

impl ContextArgs {
    /// JSON object holding the supplied values, keyed by field.
    pub fn to_json(&self) -> Value {
        let pairs = [
            (Field::Account, &self.account),
            (Field::Team, &self.team),
            (Field::Moniker, &self.moniker),
            (Field::Provider, &self.provider),
            (Field::Region, &self.region),
        ];
        let map: Map<String, Value> = pairs
            .into_iter()
            .filter_map(|(field, value)| {
                value
                    .as_ref()
                    .map(|v| (field.key().to_string(), Value::String(v.clone())))
            })
            .collect();
        Value::Object(map)
    }

    pub fn is_empty(&self) -> bool {
        self.to_json().as_object().is_none_or(|m| m.is_empty())
    }
}

/// Which config file a write targets.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
#[group(required = true, multiple = false)]
pub struct ScopeArgs {
    /// The per-user global config
    #[arg(long)]
    pub global: bool,

    /// The project-local config (nearest .ctx/config.json, or ./.ctx/config.json)
    #[arg(long)]
    pub local: bool,
}

/// Resolved form of [`ScopeArgs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Local,
}

impl ScopeArgs {
    pub fn scope(&self) -> Scope {
        if self.global {
            Scope::Global
        } else {
            Scope::Local
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show, edit and clear stored context
    Config {
        /// Config action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage the active application
    App {
        /// App action to perform
        #[command(subcommand)]
        action: AppAction,
    },

    /// Resolve the full deployment target
    ///
    /// Fails, naming every missing field, unless account, team, moniker,
    /// provider and region are all resolved.
    Target {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the resolved context
    Show {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        /// Show which source supplied each value
        #[arg(long)]
        origin: bool,
    },

    /// Store values in the global or project-local config
    ///
    /// Examples:
    ///   ctx config set --global --account 123456789012 --provider aws
    ///   ctx config set --local --moniker billing-api --region eu-west-1
    ///   ctx config set --local --replace --team platform
    Set {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Replace the file instead of merging into it
        #[arg(long)]
        replace: bool,

        #[command(flatten)]
        values: ContextArgs,
    },

    /// Remove fields from the global or project-local config
    Unset {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Fields to remove (account, team, moniker, provider, region, active-app)
        #[arg(required = true)]
        fields: Vec<Field>,
    },

    /// Delete the global or project-local config file
    Clear {
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Print the config file locations
    Path,
}

/// Active application actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Set the active application
    ///
    /// Examples:
    ///   ctx app use 123456789012/platform/billing-api --global
    Use {
        /// Application as <account>/<team>/<moniker>
        app: String,

        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Show the resolved active application
    Show,

    /// Remove the active application
    Clear {
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

//! Context display and config file commands

use std::path::Path;

use colored::Colorize;
use ctx_core::{ConfigWriter, Context, ContextPatch, Field, Resolution, WriteMode};
use serde_json::{Map, Value};

use super::scope_label;
use crate::cli::{ContextArgs, Scope};
use crate::error::{CliError, Result};
use crate::session::Session;

/// Display the resolved context
pub fn run_config_show(session: &Session, json: bool, origin: bool) -> Result<()> {
    let resolution = session.resolver().resolve_traced(&session.overrides);

    if json {
        let output = if origin {
            serde_json::json!({
                "context": resolution.context,
                "origins": origins_json(&resolution),
            })
        } else {
            serde_json::to_value(&resolution.context)?
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Resolved Context".bold());
    println!();
    print_context(&resolution, origin);
    Ok(())
}

/// Merge or replace values in the global or project-local config
pub fn run_config_set(
    session: &Session,
    scope: Scope,
    replace: bool,
    values: &ContextArgs,
) -> Result<()> {
    if values.is_empty() && !replace {
        return Err(CliError::user(
            "Nothing to set. Pass at least one of --account, --team, --moniker, --provider, --region.",
        ));
    }

    let path = session.target_path(scope);
    let mode = if replace {
        WriteMode::Replace
    } else {
        WriteMode::Merge
    };
    let committed = ConfigWriter::new().write_json(&path, &values.to_json(), mode)?;

    println!(
        "{} Updated {} config at {}",
        "OK".green().bold(),
        scope_label(scope),
        path.display().to_string().cyan()
    );
    print_stored(&committed);
    Ok(())
}

/// Remove fields from the global or project-local config
pub fn run_config_unset(session: &Session, scope: Scope, fields: &[Field]) -> Result<()> {
    let path = session.target_path(scope);
    if !path.is_file() {
        println!(
            "{} No {} config at {}",
            "WARN".yellow().bold(),
            scope_label(scope),
            path.display()
        );
        return Ok(());
    }

    let patch = fields
        .iter()
        .fold(ContextPatch::new(), |patch, field| patch.clear(*field));
    let committed = ConfigWriter::new().write(&path, &patch, WriteMode::Merge)?;

    let names: Vec<&str> = fields.iter().map(|f| f.key()).collect();
    println!(
        "{} Removed {} from {} config",
        "OK".green().bold(),
        names.join(", ").cyan(),
        scope_label(scope)
    );
    print_stored(&committed);
    Ok(())
}

/// Delete the global or project-local config file
pub fn run_config_clear(session: &Session, scope: Scope) -> Result<()> {
    let path = match scope {
        Scope::Global => session.paths.global().to_path_buf(),
        // Only ever delete an existing project file, never guess one
        Scope::Local => match session.paths.find_local(&session.cwd) {
            Some(path) => path,
            None => {
                println!(
                    "{} No project-local config found from {}",
                    "WARN".yellow().bold(),
                    session.cwd.display()
                );
                return Ok(());
            }
        },
    };

    if ConfigWriter::new().clear(&path)? {
        println!(
            "{} Cleared {} config at {}",
            "OK".green().bold(),
            scope_label(scope),
            path.display().to_string().cyan()
        );
    } else {
        println!(
            "{} No {} config at {}",
            "WARN".yellow().bold(),
            scope_label(scope),
            path.display()
        );
    }
    Ok(())
}

/// Print the global and project-local config locations
pub fn run_config_path(session: &Session) -> Result<()> {
    let global = session.paths.global();
    println!("  {:<16} {}", "Global:".dimmed(), describe_path(global));

    match session.paths.find_local(&session.cwd) {
        Some(local) => println!("  {:<16} {}", "Project-local:".dimmed(), describe_path(&local)),
        None => println!(
            "  {:<16} {} {}",
            "Project-local:".dimmed(),
            "(none found)".dimmed(),
            format!("writes go to {}", session.paths.local_target(&session.cwd).display()).dimmed()
        ),
    }
    Ok(())
}

fn describe_path(path: &Path) -> String {
    if path.is_file() {
        path.display().to_string()
    } else {
        format!("{} {}", path.display(), "(absent)".dimmed())
    }
}

fn origins_json(resolution: &Resolution) -> Value {
    let map: Map<String, Value> = resolution
        .origins
        .iter()
        .map(|(field, origin)| (field.key().to_string(), Value::String(origin.to_string())))
        .collect();
    Value::Object(map)
}

fn field_display(context: &Context, field: Field) -> Option<String> {
    match field {
        Field::Account => context.account.clone(),
        Field::Team => context.team.clone(),
        Field::Moniker => context.moniker.clone(),
        Field::Provider => context.provider.map(|p| p.to_string()),
        Field::Region => context.region.clone(),
        Field::ActiveApp => context.active_app.as_ref().map(|app| app.to_string()),
    }
}

fn print_context(resolution: &Resolution, origin: bool) {
    for field in Field::ALL {
        let label = format!("{}:", field.key());
        match field_display(&resolution.context, field) {
            Some(value) if origin => {
                let source = resolution
                    .origins
                    .get(&field)
                    .map(|o| o.to_string())
                    .unwrap_or_default();
                println!(
                    "  {:<12} {:<32} {}",
                    label.dimmed(),
                    value,
                    format!("({})", source).dimmed()
                );
            }
            Some(value) => println!("  {:<12} {}", label.dimmed(), value),
            None => println!("  {:<12} {}", label.dimmed(), "(unset)".dimmed()),
        }
    }
}

fn print_stored(context: &Context) {
    for field in Field::ALL {
        if let Some(value) = field_display(context, field) {
            println!("   {} {} = {}", "+".green(), field.key(), value);
        }
    }
}

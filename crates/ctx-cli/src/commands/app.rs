//! Active application commands

use colored::Colorize;
use ctx_core::{ConfigWriter, ContextPatch, Field, WriteMode};

use super::scope_label;
use crate::cli::Scope;
use crate::error::{CliError, Result};
use crate::session::Session;

/// Set the active application from an `<account>/<team>/<moniker>` reference
pub fn run_app_use(session: &Session, app: &str, scope: Scope) -> Result<()> {
    let mut update = serde_json::Map::new();
    update.insert(Field::ActiveApp.key().to_string(), parse_app_ref(app)?);
    let update = serde_json::Value::Object(update);
    let path = session.target_path(scope);
    let committed = ConfigWriter::new().write_json(&path, &update, WriteMode::Merge)?;

    if let Some(active) = committed.active_app {
        println!(
            "{} Active app set to {} in {} config",
            "OK".green().bold(),
            active.to_string().cyan(),
            scope_label(scope)
        );
    }
    Ok(())
}

/// Show the resolved active application
pub fn run_app_show(session: &Session) -> Result<()> {
    let resolution = session.resolver().resolve_traced(&session.overrides);
    match resolution.context.active_app {
        Some(app) => {
            let source = resolution
                .origins
                .get(&Field::ActiveApp)
                .map(|o| o.to_string())
                .unwrap_or_default();
            println!("{} {}", app.to_string().cyan(), format!("({})", source).dimmed());
        }
        None => println!("{}", "No active app set.".dimmed()),
    }
    Ok(())
}

/// Remove the active application from the global or project-local config
pub fn run_app_clear(session: &Session, scope: Scope) -> Result<()> {
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

    ConfigWriter::new().write(
        &path,
        &ContextPatch::new().clear(Field::ActiveApp),
        WriteMode::Merge,
    )?;
    println!(
        "{} Active app removed from {} config",
        "OK".green().bold(),
        scope_label(scope)
    );
    Ok(())
}

/// Split `<account>/<team>/<moniker>` into a JSON object for validation.
fn parse_app_ref(app_ref: &str) -> Result<serde_json::Value> {
    let parts: Vec<&str> = app_ref.split('/').collect();
    match parts.as_slice() {
        [account, team, moniker] => Ok(serde_json::json!({
            "account": account,
            "team": team,
            "moniker": moniker,
        })),
        _ => Err(CliError::user(format!(
            "Invalid app '{}': expected <account>/<team>/<moniker>",
            app_ref
        ))),
    }
}

//! ctx CLI
//!
//! Reads and edits the default account, team, app moniker, provider and
//! region used by cloud commands.

mod cli;
mod commands;
mod error;
mod session;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{AppAction, Cli, Commands, ConfigAction};
use error::Result;
use session::Session;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli {
        verbose,
        overrides,
        command,
    } = Cli::parse();

    init_tracing(verbose);

    match command {
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "ctx", &mut std::io::stdout());
            Ok(())
        }
        Some(cmd) => {
            let session = Session::from_env(&overrides)?;
            execute_command(cmd, &session)
        }
        None => {
            // No command provided - show help hint
            println!("{} context manager", "ctx".green().bold());
            println!();
            println!("Run {} for available commands.", "ctx --help".cyan());
            Ok(())
        }
    }
}

/// Log to stderr. `--verbose` forces DEBUG; otherwise `RUST_LOG` applies,
/// defaulting to warnings so corrupt config files are always reported.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();

    tracing::debug!("Verbose mode enabled");
}

fn execute_command(cmd: Commands, session: &Session) -> Result<()> {
    match cmd {
        Commands::Config { action } => match action {
            ConfigAction::Show { json, origin } => commands::run_config_show(session, json, origin),
            ConfigAction::Set {
                scope,
                replace,
                values,
            } => commands::run_config_set(session, scope.scope(), replace, &values),
            ConfigAction::Unset { scope, fields } => {
                commands::run_config_unset(session, scope.scope(), &fields)
            }
            ConfigAction::Clear { scope } => commands::run_config_clear(session, scope.scope()),
            ConfigAction::Path => commands::run_config_path(session),
        },
        Commands::App { action } => match action {
            AppAction::Use { app, scope } => commands::run_app_use(session, &app, scope.scope()),
            AppAction::Show => commands::run_app_show(session),
            AppAction::Clear { scope } => commands::run_app_clear(session, scope.scope()),
        },
        Commands::Target { json } => commands::run_target(session, json),
        Commands::Completions { .. } => Ok(()),
    }
}

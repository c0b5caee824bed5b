//! Deployment target resolution

use colored::Colorize;

use crate::error::Result;
use crate::session::Session;

/// Resolve the context and require every field a deployment needs
pub fn run_target(session: &Session, json: bool) -> Result<()> {
    let context = session.resolver().resolve_traced(&session.overrides).context;
    let target = context.require_target()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&target)?);
        return Ok(());
    }

    println!("{}", "Deployment Target".bold());
    println!();
    println!("  {:<12} {}", "Account:".dimmed(), target.account);
    println!("  {:<12} {}", "Team:".dimmed(), target.team);
    println!("  {:<12} {}", "Moniker:".dimmed(), target.moniker);
    println!("  {:<12} {}", "Provider:".dimmed(), target.provider);
    println!("  {:<12} {}", "Region:".dimmed(), target.region);
    Ok(())
}

//! Sync, update and outdated command implementations
//!
//! These commands bring installed rulesets in line with their sources.

use colored::Colorize;

use rulesets_core::SyncOptions;

use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the sync command
pub fn run_sync(ctx: &Context, names: Vec<String>, preserve_local: bool) -> Result<()> {
    println!("{} Synchronizing installed rulesets...", "=>".blue().bold());

    let mut coordinator = ctx.coordinator();
    let options = SyncOptions {
        preserve_local,
        only: (!names.is_empty()).then_some(names),
    };
    let result = coordinator.sync_installed_rulesets(&options)?;

    if result.updated.is_empty() && result.is_clean() {
        println!("{} Already up to date.", "OK".green().bold());
        return Ok(());
    }

    let installed = coordinator.installed();
    for name in &result.updated {
        let suffix = if result.preserved.contains(name) {
            " (local modifications kept)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("   {} {}{}", "+".green(), name.cyan(), suffix);
        if let Some(record) = installed.get(name) {
            ctx.record_baseline(&coordinator, name, &record.destinations)?;
        }
    }
    for name in &result.conflicts {
        println!(
            "   {} {}: local modifications no longer apply",
            "CONFLICT".red().bold(),
            name.cyan()
        );
    }
    for name in &result.failed {
        println!("   {} {}", "FAILED".red().bold(), name.cyan());
    }

    if !result.conflicts.is_empty() {
        println!();
        println!(
            "See {} for resolution steps.",
            ".rulesets/conflicts/".cyan()
        );
    }

    if result.is_clean() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "sync incomplete: {} conflicted, {} failed",
            result.conflicts.len(),
            result.failed.len()
        )))
    }
}

/// Run the update command
pub fn run_update(ctx: &Context, name: &str) -> Result<()> {
    println!("{} Updating {}...", "=>".blue().bold(), name.cyan());

    let mut coordinator = ctx.coordinator();
    let result = coordinator.update_ruleset(name)?;

    if !result.success {
        return Err(CliError::user(format!(
            "{}: {}",
            name,
            result.reason.as_deref().unwrap_or("update failed")
        )));
    }

    println!(
        "{} {} {} -> {}",
        "OK".green().bold(),
        name.cyan(),
        result.previous_version.as_deref().unwrap_or("?").dimmed(),
        result.new_version.as_deref().unwrap_or("?")
    );
    if let Some(record) = coordinator.installed().get(name) {
        ctx.record_baseline(&coordinator, name, &record.destinations)?;
    }
    Ok(())
}

/// Run the outdated command
pub fn run_outdated(ctx: &Context, json: bool) -> Result<()> {
    let mut coordinator = ctx.coordinator();
    let updates = coordinator.check_for_updates();

    if json {
        println!("{}", serde_json::to_string_pretty(&updates)?);
        return Ok(());
    }

    if updates.is_empty() {
        println!("{} All installed rulesets are up to date.", "OK".green().bold());
        return Ok(());
    }

    println!("{}", "Updates available".bold());
    println!();
    for update in &updates {
        println!(
            "  {:<20} {} -> {}",
            update.name.cyan(),
            update.current_version.dimmed(),
            update.available_version.green()
        );
    }
    println!();
    println!("Run {} to apply.", "rulesets sync".cyan());
    Ok(())
}

//! Install command implementation

use colored::Colorize;

use rulesets_core::InstallOptions;

use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the install command
///
/// Installs every named ruleset and records a drift baseline for the
/// destinations written. Fails when any ruleset could not be installed.
pub fn run_install(
    ctx: &Context,
    names: &[String],
    destinations: Vec<String>,
    force: bool,
    preserve_local: bool,
) -> Result<()> {
    let destinations = ctx.destinations_or_default(destinations);
    println!(
        "{} Installing {} into {}...",
        "=>".blue().bold(),
        names.join(", ").cyan(),
        destinations.join(", ").dimmed()
    );

    let mut coordinator = ctx.coordinator();
    let options = InstallOptions {
        force,
        preserve_local,
    };
    let results = coordinator.install_rulesets(names, &destinations, &options)?;

    let mut failures = 0;
    for result in &results {
        if result.success {
            println!(
                "{} {} {} -> {}",
                "OK".green().bold(),
                result.name.cyan(),
                result.version.as_deref().unwrap_or_default().dimmed(),
                result.installed_to.join(", ")
            );
        } else {
            failures += 1;
            println!(
                "{} {}: {}",
                "FAILED".red().bold(),
                result.name.cyan(),
                result.reason.as_deref().unwrap_or("unknown error")
            );
        }
        for skipped in &result.skipped {
            println!(
                "   {} unknown destination '{}' skipped",
                "warning:".yellow().bold(),
                skipped
            );
        }
        if !result.installed_to.is_empty() {
            ctx.record_baseline(&coordinator, &result.name, &result.installed_to)?;
        }
    }

    if failures > 0 {
        return Err(CliError::user(format!(
            "{} of {} rulesets failed to install",
            failures,
            results.len()
        )));
    }
    Ok(())
}

//! Remove command implementation

use colored::Colorize;

use rulesets_core::RemoveOptions;

use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the remove command
///
/// Rulesets still sharing an edited file get a fresh drift baseline so the
/// removal is not reported as drift.
pub fn run_remove(ctx: &Context, name: &str, destinations: Vec<String>) -> Result<()> {
    println!("{} Removing {}...", "=>".blue().bold(), name.cyan());

    let mut coordinator = ctx.coordinator();
    let options = RemoveOptions {
        destinations: (!destinations.is_empty()).then_some(destinations),
    };
    let result = coordinator.remove_ruleset(name, &options)?;

    if let Some(reason) = &result.reason {
        return Err(CliError::user(reason.clone()));
    }

    if result.removed_from.is_empty() {
        println!("{} Nothing to remove.", "OK".green().bold());
    } else {
        println!(
            "{} Removed {} from {}",
            "OK".green().bold(),
            name.cyan(),
            result.removed_from.join(", ")
        );
    }
    for error in &result.errors {
        println!("   {} {}", "!".red(), error);
    }

    for (other, record) in coordinator.installed() {
        let shared: Vec<String> = record
            .destinations
            .into_iter()
            .filter(|id| result.removed_from.contains(id))
            .collect();
        if !shared.is_empty() {
            ctx.record_baseline(&coordinator, &other, &shared)?;
        }
    }

    if result.success {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} destinations of '{}' could not be edited and remain installed",
            result.errors.len(),
            name
        )))
    }
}

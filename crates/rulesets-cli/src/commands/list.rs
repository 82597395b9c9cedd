//! List command implementation

use colored::Colorize;
use serde_json::json;

use crate::context::Context;
use crate::error::Result;

/// Run the list command
///
/// Lists installed rulesets, or with `available` the rulesets in the home.
pub fn run_list(ctx: &Context, available: bool, json: bool) -> Result<()> {
    if available {
        list_available(ctx, json)
    } else {
        list_installed(ctx, json)
    }
}

fn list_installed(ctx: &Context, json: bool) -> Result<()> {
    let installed = ctx.coordinator().installed();

    if json {
        println!("{}", serde_json::to_string_pretty(&installed)?);
        return Ok(());
    }

    if installed.is_empty() {
        println!(
            "No rulesets installed. Use {} to add one.",
            "rulesets install <name>".cyan()
        );
        return Ok(());
    }

    println!("{}", "Installed Rulesets".bold());
    println!();
    for (name, record) in &installed {
        println!(
            "  {:<20} {:<10} {} ({})",
            name.green(),
            record.version,
            record.destinations.join(", "),
            record.source.to_string().dimmed()
        );
    }
    Ok(())
}

fn list_available(ctx: &Context, json: bool) -> Result<()> {
    let store = ctx.store();
    let names = store.list()?;

    let entries: Vec<_> = names
        .iter()
        .map(|name| match store.load_metadata(name) {
            Ok(metadata) => (name, Some(metadata)),
            Err(e) => {
                tracing::warn!(ruleset = %name, error = %e, "Unreadable metadata");
                (name, None)
            }
        })
        .collect();

    if json {
        let output: Vec<serde_json::Value> = entries
            .iter()
            .map(|(name, metadata)| {
                json!({
                    "name": name,
                    "version": metadata.as_ref().map(|m| m.version()),
                    "description": metadata.as_ref().and_then(|m| m.set.description.as_deref()),
                    "extends": metadata.as_ref().map(|m| m.parents().to_vec()).unwrap_or_default(),
                    "overrides": metadata.as_ref().map(|m| m.overrides.clone()).unwrap_or_default(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!(
            "No rulesets in {}. Use {} to add one.",
            store.sets_dir().to_string().cyan(),
            "rulesets create <name>".cyan()
        );
        return Ok(());
    }

    println!("{}", "Available Rulesets".bold());
    println!();
    for (name, metadata) in &entries {
        match metadata {
            Some(metadata) => {
                println!(
                    "  {:<20} {:<10} {}",
                    name.green(),
                    metadata.version(),
                    metadata.set.description.as_deref().unwrap_or_default().dimmed()
                );
                for (key, value) in &metadata.overrides {
                    println!("  {:<20} {} = {}", "", key.dimmed(), value);
                }
            }
            None => println!("  {:<20} {}", name.yellow(), "(invalid meta.toml)".dimmed()),
        }
    }
    println!();
    println!(
        "{} {} rulesets. Use {} to add one.",
        "Total:".dimmed(),
        entries.len(),
        "rulesets install <name>".cyan()
    );
    Ok(())
}

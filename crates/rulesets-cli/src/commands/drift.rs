//! Drift check and history command implementations

use chrono::{DateTime, Utc};
use colored::Colorize;

use rulesets_core::{DriftEntry, HistoryQuery};

use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the drift check command
///
/// Compares every installed destination file against its last recorded
/// content. Each file is checked once even when rulesets share it.
pub fn run_drift_check(ctx: &Context) -> Result<()> {
    println!("{} Checking installed files for drift...", "=>".blue().bold());

    let detector = ctx.drift_detector();
    if !detector.is_enabled() {
        println!(
            "{} Drift detection is disabled in {}.",
            "warning:".yellow().bold(),
            "config.toml".cyan()
        );
        return Ok(());
    }

    let coordinator = ctx.coordinator();
    let mut drifts = Vec::new();
    for check in ctx.installed_drift_checks(&coordinator) {
        drifts.extend(detector.check_drift(&check)?.drifts);
    }

    if drifts.is_empty() {
        println!("{} No drift detected.", "OK".green().bold());
        return Ok(());
    }

    println!("{} Installed files were edited:", "DRIFTED".red().bold());
    for drift in &drifts {
        print_drift(drift);
    }
    println!();
    println!(
        "Use {} to keep an edit across syncs, or {} to restore.",
        "rulesets track".cyan(),
        "rulesets install --force".cyan()
    );
    Ok(())
}

/// Run the drift history command
pub fn run_drift_history(
    ctx: &Context,
    limit: usize,
    destination: Option<String>,
    since: Option<String>,
    json: bool,
) -> Result<()> {
    let since = since.map(|raw| parse_since(&raw)).transpose()?;
    let query = HistoryQuery {
        limit,
        since,
        destination,
    };
    let drifts = ctx.drift_detector().drift_history(&query);

    if json {
        println!("{}", serde_json::to_string_pretty(&drifts)?);
        return Ok(());
    }

    if drifts.is_empty() {
        println!("No drift recorded.");
        return Ok(());
    }

    println!("{}", "Drift History".bold());
    println!();
    for drift in &drifts {
        print_drift(drift);
    }
    Ok(())
}

fn parse_since(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| CliError::user(format!("Invalid --since timestamp '{raw}': {e}")))
}

fn print_drift(drift: &DriftEntry) {
    println!(
        "   {} {} ({}) {}",
        "!".red(),
        drift.path.cyan(),
        drift.destination.dimmed(),
        drift.timestamp.to_rfc3339().dimmed()
    );
    for line in drift.diff.lines() {
        let line = match line.chars().next() {
            Some('+') => line.green().to_string(),
            Some('-') => line.red().to_string(),
            _ => line.to_string(),
        };
        println!("      {line}");
    }
}

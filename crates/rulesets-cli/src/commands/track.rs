//! Track and clear-mods command implementations

use colored::Colorize;

use rulesets_core::{Modification, ModificationKind, ReplaceSpec};

use crate::context::Context;
use crate::error::{CliError, Result};

/// A local change given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Append(String),
    Prepend(String),
    Replace {
        pattern: String,
        replacement: String,
        flags: String,
    },
}

impl Change {
    /// Build from the mutually exclusive `track` flags.
    pub fn from_args(
        append: Option<String>,
        prepend: Option<String>,
        replace: Option<String>,
        with: Option<String>,
        flags: String,
    ) -> Result<Self> {
        match (append, prepend, replace) {
            (Some(text), None, None) => Ok(Self::Append(text)),
            (None, Some(text), None) => Ok(Self::Prepend(text)),
            (None, None, Some(pattern)) => {
                let replacement = with
                    .ok_or_else(|| CliError::user("--replace requires --with"))?;
                Ok(Self::Replace {
                    pattern,
                    replacement,
                    flags,
                })
            }
            _ => Err(CliError::user(
                "Give exactly one of --append, --prepend or --replace",
            )),
        }
    }

    fn into_kind(self) -> ModificationKind {
        match self {
            Self::Append(content) => ModificationKind::Append { content },
            Self::Prepend(content) => ModificationKind::Prepend { content },
            Self::Replace {
                pattern,
                replacement,
                flags,
            } => ModificationKind::Replace(ReplaceSpec::new(pattern, flags, replacement)),
        }
    }
}

/// Run the track command
pub fn run_track(ctx: &Context, name: &str, destination: &str, change: Change) -> Result<()> {
    let coordinator = ctx.coordinator();

    if !coordinator.destinations().contains(destination) {
        return Err(CliError::user(format!(
            "Unknown destination '{}'. Valid: {}",
            destination,
            coordinator.destinations().ids().join(", ")
        )));
    }

    let kind = change.into_kind();
    if let ModificationKind::Replace(spec) = &kind {
        spec.regex()
            .map_err(|e| CliError::user(e.to_string()))?;
    }

    coordinator.track_modification(name, Modification::new(destination, kind))?;
    let count = coordinator.modifications(name).len();

    println!(
        "{} Tracked modification for {} ({} total)",
        "OK".green().bold(),
        name.cyan(),
        count
    );
    println!(
        "   Reapplied by {} and {}.",
        "rulesets sync --preserve-local".cyan(),
        "rulesets update".cyan()
    );
    Ok(())
}

/// Run the clear-mods command
pub fn run_clear_mods(ctx: &Context, name: &str) -> Result<()> {
    if ctx.coordinator().clear_modifications(name)? {
        println!(
            "{} Cleared local modifications for {}",
            "OK".green().bold(),
            name.cyan()
        );
    } else {
        println!("{} No modifications tracked for {}", "OK".green().bold(), name.cyan());
    }
    Ok(())
}

//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

/// Rulesets - Distribute reusable instruction rulesets to AI tool config files
#[derive(Parser, Debug)]
#[command(name = "rulesets")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Rulesets home holding `sets/` and `config.toml`
    #[arg(long, global = true, env = "RULESETS_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install rulesets into the project
    ///
    /// Examples:
    ///   rulesets install typescript
    ///   rulesets install react -d claude-code -d cursor
    Install {
        /// Rulesets to install
        #[arg(required = true)]
        names: Vec<String>,

        /// Destination ids (defaults to the configured default destination)
        #[arg(short, long = "destination", value_name = "ID")]
        destinations: Vec<String>,

        /// Reinstall even if already installed
        #[arg(long)]
        force: bool,

        /// Reapply tracked local modifications
        #[arg(long)]
        preserve_local: bool,
    },

    /// Rewrite installed rulesets that have updates available
    Sync {
        /// Only sync these rulesets
        names: Vec<String>,

        /// Reapply tracked local modifications
        #[arg(long)]
        preserve_local: bool,
    },

    /// Update one installed ruleset, keeping local modifications
    Update {
        /// Ruleset name
        name: String,
    },

    /// Remove an installed ruleset
    Remove {
        /// Ruleset name
        name: String,

        /// Remove only from these destination ids
        #[arg(short, long = "destination", value_name = "ID")]
        destinations: Vec<String>,
    },

    /// List installed rulesets with updates available
    Outdated {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List installed rulesets
    List {
        /// List rulesets available in the home instead
        #[arg(long)]
        available: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Create a new ruleset in the home
    Create {
        /// Ruleset name
        name: String,

        /// Rulesets to extend
        #[arg(long, value_name = "NAME")]
        extends: Vec<String>,

        /// Rule text
        #[arg(long)]
        rules: Option<String>,

        /// Initial version
        #[arg(long, value_name = "VERSION")]
        version: Option<String>,

        /// Short description
        #[arg(long)]
        description: Option<String>,
    },

    /// Track a local modification to reapply on sync
    ///
    /// Examples:
    ///   rulesets track react -d cursor --append "Use pnpm."
    ///   rulesets track react -d cursor --replace "tabs" --with "spaces" --flags g
    #[command(group(
        ArgGroup::new("change")
            .required(true)
            .args(["append", "prepend", "replace"])
    ))]
    Track {
        /// Ruleset name
        name: String,

        /// Destination id the modification applies to
        #[arg(short, long, value_name = "ID")]
        destination: String,

        /// Text to append
        #[arg(long)]
        append: Option<String>,

        /// Text to prepend
        #[arg(long)]
        prepend: Option<String>,

        /// Regex pattern to replace
        #[arg(long, value_name = "PATTERN", requires = "with")]
        replace: Option<String>,

        /// Replacement text
        #[arg(long, value_name = "TEXT", requires = "replace")]
        with: Option<String>,

        /// Regex flags (i, m, s, x, g)
        #[arg(long, default_value = "", requires = "replace")]
        flags: String,
    },

    /// Forget tracked modifications for a ruleset
    ClearMods {
        /// Ruleset name
        name: String,
    },

    /// Detect out-of-band edits to installed files
    Drift {
        #[command(subcommand)]
        action: DriftAction,
    },
}

/// Drift subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum DriftAction {
    /// Compare installed files against their last recorded content
    Check,

    /// Show recorded drift
    History {
        /// Most recent entries to show
        #[arg(long, default_value_t = 100)]
        limit: usize,

        /// Only this destination id
        #[arg(long, value_name = "ID")]
        destination: Option<String>,

        /// Only entries at or after this RFC 3339 timestamp
        #[arg(long, value_name = "TIMESTAMP")]
        since: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

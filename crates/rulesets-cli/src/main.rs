//! Rulesets CLI
//!
//! Installs, updates and removes composed rulesets in a project and checks
//! installed files for out-of-band edits.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands, DriftAction};
use context::Context;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialise logging: {}", "warning".yellow().bold(), e);
    }

    let Some(command) = cli.command else {
        println!("{} Rulesets CLI", "rulesets".green().bold());
        println!();
        println!("Run {} for available commands.", "rulesets --help".cyan());
        return Ok(());
    };

    let ctx = Context::resolve(cli.project.as_deref(), cli.home.as_deref())?;
    execute_command(&ctx, command)
}

fn execute_command(ctx: &Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Install {
            names,
            destinations,
            force,
            preserve_local,
        } => commands::run_install(ctx, &names, destinations, force, preserve_local),
        Commands::Sync {
            names,
            preserve_local,
        } => commands::run_sync(ctx, names, preserve_local),
        Commands::Update { name } => commands::run_update(ctx, &name),
        Commands::Remove { name, destinations } => commands::run_remove(ctx, &name, destinations),
        Commands::Outdated { json } => commands::run_outdated(ctx, json),
        Commands::List { available, json } => commands::run_list(ctx, available, json),
        Commands::Create {
            name,
            extends,
            rules,
            version,
            description,
        } => commands::run_create(ctx, &name, extends, rules, version, description),
        Commands::Track {
            name,
            destination,
            append,
            prepend,
            replace,
            with,
            flags,
        } => {
            let change = commands::Change::from_args(append, prepend, replace, with, flags)?;
            commands::run_track(ctx, &name, &destination, change)
        }
        Commands::ClearMods { name } => commands::run_clear_mods(ctx, &name),
        Commands::Drift { action } => match action {
            DriftAction::Check => commands::run_drift_check(ctx),
            DriftAction::History {
                limit,
                destination,
                since,
                json,
            } => commands::run_drift_history(ctx, limit, destination, since, json),
        },
    }
}

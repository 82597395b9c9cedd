//! Create command implementation

use colored::Colorize;

use rulesets_core::{CreateRuleset, RulesetMetadata};

use crate::context::Context;
use crate::error::Result;

/// Run the create command
pub fn run_create(
    ctx: &Context,
    name: &str,
    extends: Vec<String>,
    rules: Option<String>,
    version: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let store = ctx.store();

    let mut metadata = RulesetMetadata::default();
    if let Some(version) = version {
        metadata.set.version = version;
    }
    metadata.set.description = description;

    let created = store.create(
        name,
        CreateRuleset {
            rules: rules.unwrap_or_default(),
            extends,
            metadata: Some(metadata),
        },
    )?;

    println!(
        "{} Created {} {} at {}",
        "OK".green().bold(),
        name.cyan(),
        created.version().dimmed(),
        store.ruleset_dir(name)
    );
    if !created.parents().is_empty() {
        println!("   extends {}", created.parents().join(", "));
    }
    Ok(())
}

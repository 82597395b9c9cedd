//! Conflict artifacts
//!
//! When tracked modifications no longer apply to new upstream content, the
//! destinations are left alone and a markdown file describing the conflict
//! is written to `.rulesets/conflicts/<name>.md`.

use rulesets_fs::{NormalizedPath, RulesetsPath, io};

use crate::Result;
use crate::ledger::Modification;

/// Render the conflict artifact for `name`.
pub fn conflict_artifact(
    name: &str,
    upstream: &str,
    modifications: &[Modification],
) -> Result<String> {
    let mods = serde_json::to_string_pretty(modifications)?;
    Ok(format!(
        "# CONFLICT: {name}\n\
         \n\
         ## New Version from Source\n\
         {upstream}\n\
         \n\
         ## Local Modifications\n\
         ```json\n\
         {mods}\n\
         ```\n\
         \n\
         ## Resolution\n\
         To resolve this conflict:\n\
         1. Review the changes above\n\
         2. Manually update your destination files\n\
         3. Clear modifications: rulesets clear-mods {name}\n\
         4. Sync again: rulesets sync {name}\n"
    ))
}

/// Write the artifact under `root` and return its path.
pub fn write_conflict_artifact(
    root: &NormalizedPath,
    name: &str,
    upstream: &str,
    modifications: &[Modification],
) -> Result<NormalizedPath> {
    let path = root
        .join(RulesetsPath::StateDir.as_str())
        .join(RulesetsPath::ConflictsDir.as_str())
        .join(&format!("{name}.md"));
    io::write_text(&path, &conflict_artifact(name, upstream, modifications)?)?;
    tracing::warn!(ruleset = name, path = %path, "Wrote conflict artifact");
    Ok(path)
}

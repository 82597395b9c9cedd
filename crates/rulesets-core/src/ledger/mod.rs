//! Installation ledger
//!
//! The ledger records which rulesets are installed in a project, where they
//! were written, and which local modifications should be reapplied on sync.
//! It is persisted as JSON at `<project>/.rulesets/installed.json`.

mod modification;
mod record;

pub use modification::{
    ApplyError, Modification, ModificationKind, ReplaceSpec, apply_modifications,
};
pub use record::{InstallationRecord, RulesetSource};

use std::collections::BTreeMap;

use rulesets_fs::{ConfigStore, NormalizedPath, RulesetsPath, io};
use serde::{Deserialize, Serialize};

use crate::Result;

const LEDGER_COMMENT: &str =
    "Managed by rulesets. Records installed rulesets and tracked local modifications.";

fn default_comment() -> String {
    LEDGER_COMMENT.to_string()
}

/// Persisted installation state of one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(rename = "_comment", default = "default_comment")]
    comment: String,
    #[serde(default)]
    installed: BTreeMap<String, InstallationRecord>,
    #[serde(default)]
    modified: BTreeMap<String, Vec<Modification>>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create a new empty ledger
    pub fn new() -> Self {
        Self {
            comment: default_comment(),
            installed: BTreeMap::new(),
            modified: BTreeMap::new(),
        }
    }

    /// Ledger location for a project rooted at `root`.
    pub fn path_for(root: &NormalizedPath) -> NormalizedPath {
        root.join(RulesetsPath::StateDir.as_str())
            .join(RulesetsPath::Ledger.as_str())
    }

    /// Load a ledger, treating a missing or unreadable file as empty.
    pub fn load(path: &NormalizedPath) -> Self {
        let content = match io::read_optional_text(path) {
            Ok(Some(content)) => content,
            Ok(None) => return Self::new(),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Unreadable ledger, starting empty");
                return Self::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(ledger) => ledger,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Corrupt ledger, starting empty");
                Self::new()
            }
        }
    }

    /// Save the ledger atomically.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        ConfigStore::new().save(path, self)?;
        tracing::debug!(path = %path, installed = self.installed.len(), "Saved ledger");
        Ok(())
    }

    pub fn installed(&self) -> &BTreeMap<String, InstallationRecord> {
        &self.installed
    }

    /// Installed ruleset names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.installed.keys().cloned().collect()
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&InstallationRecord> {
        self.installed.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut InstallationRecord> {
        self.installed.get_mut(name)
    }

    /// Insert or replace the record for `name`.
    pub fn set(&mut self, name: impl Into<String>, record: InstallationRecord) {
        self.installed.insert(name.into(), record);
    }

    /// Remove the record for `name` together with its modifications.
    pub fn remove(&mut self, name: &str) -> Option<InstallationRecord> {
        self.modified.remove(name);
        self.installed.remove(name)
    }

    /// Tracked modifications for `name` in insertion order.
    pub fn modifications(&self, name: &str) -> &[Modification] {
        self.modified.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn push_modification(&mut self, name: impl Into<String>, modification: Modification) {
        self.modified.entry(name.into()).or_default().push(modification);
    }

    /// Forget all modifications for `name`. Returns whether any existed.
    pub fn clear_modifications(&mut self, name: &str) -> bool {
        self.modified.remove(name).is_some_and(|mods| !mods.is_empty())
    }
}

//! Operation options and structured results

use serde::{Deserialize, Serialize};

/// Options for [`install_ruleset`](super::SyncCoordinator::install_ruleset)
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Reinstall even when already installed
    pub force: bool,
    /// Reapply tracked modifications to the composed content
    pub preserve_local: bool,
}

/// Options for [`sync_installed_rulesets`](super::SyncCoordinator::sync_installed_rulesets)
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub preserve_local: bool,
    /// Restrict the sync to these names; all installed names otherwise
    pub only: Option<Vec<String>>,
}

/// Options for [`remove_ruleset`](super::SyncCoordinator::remove_ruleset)
#[derive(Debug, Clone, Default)]
pub struct RemoveOptions {
    /// Remove from these destinations only; all recorded ones otherwise
    pub destinations: Option<Vec<String>>,
}

/// Outcome of installing one ruleset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallResult {
    pub name: String,
    pub success: bool,
    /// Destination ids written
    pub installed_to: Vec<String>,
    /// Requested destination ids that are not known
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl InstallResult {
    pub fn failure(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: false,
            installed_to: Vec::new(),
            skipped: Vec::new(),
            version: None,
            reason: Some(reason.into()),
        }
    }
}

/// An installed ruleset whose source version differs from the recorded one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfo {
    pub name: String,
    pub current_version: String,
    pub available_version: String,
}

/// Outcome of syncing all eligible rulesets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub updated: Vec<String>,
    pub failed: Vec<String>,
    pub conflicts: Vec<String>,
    /// Updated rulesets whose local modifications were reapplied
    pub preserved: Vec<String>,
}

impl SyncResult {
    /// True when nothing failed or conflicted.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.conflicts.is_empty()
    }
}

/// Outcome of updating one ruleset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl UpdateResult {
    pub fn failure(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: false,
            previous_version: None,
            new_version: None,
            reason: Some(reason.into()),
        }
    }
}

/// Outcome of removing one ruleset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResult {
    pub name: String,
    pub success: bool,
    /// Destination ids whose region was excised
    pub removed_from: Vec<String>,
    /// Destination ids whose file could not be edited; kept in the ledger
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RemoveResult {
    pub fn failure(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: false,
            removed_from: Vec::new(),
            errors: Vec::new(),
            reason: Some(reason.into()),
        }
    }
}

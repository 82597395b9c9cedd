//! Per-ruleset installation record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where an installed ruleset was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulesetSource {
    /// The user-wide rulesets home
    Global,
    /// A project-local ruleset directory
    Local,
}

impl std::fmt::Display for RulesetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// One installed ruleset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationRecord {
    /// Version written at the last install or sync
    pub version: String,
    pub source: RulesetSource,
    /// Destination ids currently holding this ruleset's region
    pub destinations: Vec<String>,
    pub installed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
    /// Checksum of the content last written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl InstallationRecord {
    pub fn new(version: impl Into<String>, source: RulesetSource, destinations: Vec<String>) -> Self {
        Self {
            version: version.into(),
            source,
            destinations,
            installed_at: Utc::now(),
            last_sync: None,
            checksum: None,
        }
    }

    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    pub fn has_destination(&self, id: &str) -> bool {
        self.destinations.iter().any(|d| d == id)
    }
}

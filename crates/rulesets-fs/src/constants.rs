//! Well-known file and directory names.

use std::path::Path;

/// Standard names used inside a project and inside the rulesets home.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesetsPath {
    /// The `.rulesets` state directory at the project root
    StateDir,
    /// The installation ledger inside the state directory
    Ledger,
    /// Drift snapshots, one JSON file per destination path
    SnapshotsDir,
    /// Conflict artifacts written during sync
    ConflictsDir,
    /// Append-only drift/compilation history
    History,
    /// Directory holding one subdirectory per ruleset in the home
    SetsDir,
    /// Ruleset metadata file
    Metadata,
    /// Ruleset rule text
    Rules,
    /// Global configuration file in the home
    GlobalConfig,
}

impl RulesetsPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StateDir => ".rulesets",
            Self::Ledger => "installed.json",
            Self::SnapshotsDir => "snapshots",
            Self::ConflictsDir => "conflicts",
            Self::History => "history.jsonl",
            Self::SetsDir => "sets",
            Self::Metadata => "meta.toml",
            Self::Rules => "rules.md",
            Self::GlobalConfig => "config.toml",
        }
    }
}

impl AsRef<Path> for RulesetsPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for RulesetsPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for RulesetsPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

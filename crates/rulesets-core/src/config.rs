//! Global configuration
//!
//! Read from `<home>/config.toml`. Every field has a default so a missing or
//! partial file is valid:
//!
//! ```toml
//! [rulesets]
//! default_destination = "agents-md"
//!
//! [drift]
//! enabled = true
//! history_path = ".rulesets/history.jsonl"
//! ```

use std::path::{Path, PathBuf};

use rulesets_fs::{ConfigStore, NormalizedPath, RulesetsPath};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Environment variable overriding the rulesets home directory
pub const HOME_ENV: &str = "RULESETS_HOME";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub rulesets: RulesetsSection,
    pub drift: DriftSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesetsSection {
    /// Destination used when a command names none
    pub default_destination: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftSection {
    pub enabled: bool,
    /// History file, relative to the project root unless absolute
    pub history_path: String,
}

impl Default for RulesetsSection {
    fn default() -> Self {
        Self {
            default_destination: "agents-md".to_string(),
        }
    }
}

impl Default for DriftSection {
    fn default() -> Self {
        Self {
            enabled: true,
            history_path: format!("{}/{}", RulesetsPath::StateDir, RulesetsPath::History),
        }
    }
}

impl GlobalConfig {
    /// Path of the config file inside `home`.
    pub fn path(home: &NormalizedPath) -> NormalizedPath {
        home.join(RulesetsPath::GlobalConfig.as_str())
    }

    /// Load the config from `home`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(home: &NormalizedPath) -> Self {
        Self::load_file(&Self::path(home))
    }

    /// Load from `home`, else from the first of [`search_paths`] that exists.
    pub fn discover(home: &NormalizedPath) -> Self {
        let mut candidates = vec![Self::path(home).to_native()];
        candidates.extend(search_paths());
        Self::load_first(&candidates)
    }

    /// Load the first existing file among `paths`; defaults when none exist.
    pub fn load_first(paths: &[PathBuf]) -> Self {
        match paths.iter().map(NormalizedPath::new).find(NormalizedPath::exists) {
            Some(path) => {
                tracing::debug!(path = %path, "Using global config");
                Self::load_file(&path)
            }
            None => Self::default(),
        }
    }

    fn load_file(path: &NormalizedPath) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match ConfigStore::new().load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Ignoring unreadable config, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, home: &NormalizedPath) -> Result<()> {
        ConfigStore::new().save(&Self::path(home), self)?;
        Ok(())
    }

    /// History file location for a project rooted at `root`.
    pub fn history_path(&self, root: &NormalizedPath) -> NormalizedPath {
        if Path::new(&self.drift.history_path).is_absolute() {
            NormalizedPath::new(&self.drift.history_path)
        } else {
            root.join(&self.drift.history_path)
        }
    }
}

/// Resolve the rulesets home: `$RULESETS_HOME`, else `~/.rulesets`.
pub fn resolve_home() -> Option<NormalizedPath> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Some(NormalizedPath::new(PathBuf::from(home)));
    }
    dirs::home_dir().map(|home| NormalizedPath::new(home.join(RulesetsPath::StateDir.as_str())))
}

/// Candidate locations for the global config, most preferred first.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(
            home.join(RulesetsPath::StateDir.as_str())
                .join(RulesetsPath::GlobalConfig.as_str()),
        );
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        paths.push(
            PathBuf::from(xdg)
                .join("rulesets")
                .join(RulesetsPath::GlobalConfig.as_str()),
        );
    }
    if cfg!(target_os = "macos") {
        if let Some(home) = dirs::home_dir() {
            paths.push(
                home.join("Library/Application Support/rulesets")
                    .join(RulesetsPath::GlobalConfig.as_str()),
            );
        }
    }
    paths.dedup();
    paths
}

//! Error types for rulesets-core

use std::path::PathBuf;

use crate::ledger::ApplyError;

/// Result type for rulesets-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rulesets-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A ruleset's metadata or rule text could not be loaded
    #[error("Failed to load ruleset '{name}': {source}")]
    Load {
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// Metadata parsed but lacks a required field
    #[error("Missing required field '{field}' in {path}")]
    MissingField { field: String, path: PathBuf },

    /// The extends graph loops back on itself
    #[error("Circular dependency detected: '{name}' is already being composed ({})", .chain.join(" -> "))]
    CircularDependency { name: String, chain: Vec<String> },

    /// Tracked local modifications no longer apply to upstream content
    #[error("Conflict in ruleset '{name}': {source}")]
    Conflict {
        name: String,
        #[source]
        source: ApplyError,
    },

    /// Ruleset name unusable as a directory or region name
    #[error("Invalid ruleset name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Refused to overwrite an existing ruleset
    #[error("Ruleset '{0}' already exists")]
    AlreadyExists(String),

    /// Writing or excising content at a destination failed
    #[error("Destination '{destination}' failed: {source}")]
    Destination {
        destination: String,
        #[source]
        source: rulesets_blocks::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from rulesets-fs
    #[error(transparent)]
    Fs(#[from] rulesets_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// Whether the error belongs to a single ruleset and should be reported in
    /// that ruleset's result instead of aborting a whole batch.
    ///
    /// Serialization failures are bugs rather than per-ruleset conditions and
    /// are not recoverable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Json(_) | Self::TomlSer(_))
    }

    pub(crate) fn load(name: &str, source: Error) -> Self {
        Self::Load {
            name: name.to_string(),
            source: Box::new(source),
        }
    }
}

//! Append-only JSONL history

use chrono::{DateTime, Utc};
use rulesets_fs::{NormalizedPath, io};
use serde::{Deserialize, Serialize};

use crate::Result;

/// One line of the history log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HistoryEntry {
    Compilation(CompilationEntry),
    Drift(DriftEntry),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationEntry {
    pub timestamp: DateTime<Utc>,
    pub source: SourceRef,
    pub compiled: CompiledRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub path: String,
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledRef {
    pub destination: String,
    pub path: String,
    pub hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DriftKind {
    /// The file was edited outside of rulesets
    #[default]
    ExternalModification,
}

/// A destination file whose content no longer matches its snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftEntry {
    #[serde(default)]
    pub kind: DriftKind,
    pub destination: String,
    pub path: String,
    pub source_hash: String,
    pub compiled_hash: String,
    pub last_known_hash: String,
    /// Line diff from the snapshot to the current content
    pub diff: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Compilation(entry) => entry.timestamp,
            Self::Drift(entry) => entry.timestamp,
        }
    }
}

/// Filter for [`HistoryLog::drifts`]
#[derive(Debug, Clone)]
pub struct HistoryQuery {
    /// Most recent entries to return
    pub limit: usize,
    /// Only entries at or after this instant
    pub since: Option<DateTime<Utc>>,
    pub destination: Option<String>,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            limit: 100,
            since: None,
            destination: None,
        }
    }
}

/// The history file
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: NormalizedPath,
}

impl HistoryLog {
    pub fn new(path: NormalizedPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn append(&self, entries: &[HistoryEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut content = String::new();
        for entry in entries {
            content.push_str(&serde_json::to_string(entry)?);
            content.push('\n');
        }
        io::append_text(&self.path, &content)?;
        Ok(())
    }

    /// Every readable entry in file order. Malformed lines are skipped.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        let content = match io::read_optional_text(&self.path) {
            Ok(Some(content)) => content,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path, error = %e, "Unreadable history");
                return Vec::new();
            }
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(path = %self.path, error = %e, "Skipping malformed history line");
                    None
                }
            })
            .collect()
    }

    /// Drift entries matching `query`, oldest first, at most `query.limit`.
    pub fn drifts(&self, query: &HistoryQuery) -> Vec<DriftEntry> {
        let mut drifts: Vec<DriftEntry> = self
            .entries()
            .into_iter()
            .filter_map(|entry| match entry {
                HistoryEntry::Drift(drift) => Some(drift),
                HistoryEntry::Compilation(_) => None,
            })
            .filter(|drift| query.since.is_none_or(|since| drift.timestamp >= since))
            .filter(|drift| {
                query
                    .destination
                    .as_deref()
                    .is_none_or(|destination| drift.destination == destination)
            })
            .collect();

        let skip = drifts.len().saturating_sub(query.limit);
        drifts.split_off(skip)
    }
}

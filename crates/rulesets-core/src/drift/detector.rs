//! The drift detector

use chrono::Utc;
use rulesets_fs::checksum::{compute_bytes_checksum, compute_content_checksum};
use rulesets_fs::{NormalizedPath, RulesetsPath, io};
use serde::Serialize;

use super::diff::line_diff;
use super::history::{
    CompilationEntry, CompiledRef, DriftEntry, DriftKind, HistoryEntry, HistoryLog, HistoryQuery,
    SourceRef,
};
use super::snapshot::{DriftSnapshot, SnapshotStore};
use crate::Result;
use crate::config::GlobalConfig;

/// A source file and the destination files compiled from it
#[derive(Debug, Clone, Default)]
pub struct DriftCheck {
    pub source_path: NormalizedPath,
    /// Destination id and file path, in check order
    pub compiled_paths: Vec<(String, NormalizedPath)>,
    /// Source text, read from `source_path` when absent
    pub source_content: Option<String>,
}

impl DriftCheck {
    pub fn new(source_path: NormalizedPath) -> Self {
        Self {
            source_path,
            ..Self::default()
        }
    }

    pub fn with_destination(mut self, destination: impl Into<String>, path: NormalizedPath) -> Self {
        self.compiled_paths.push((destination.into(), path));
        self
    }

    pub fn with_source_content(mut self, content: impl Into<String>) -> Self {
        self.source_content = Some(content.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftReport {
    pub has_drift: bool,
    pub drifts: Vec<DriftEntry>,
}

/// Snapshots destination files and reports when they change out of band.
#[derive(Debug, Clone)]
pub struct DriftDetector {
    snapshots: SnapshotStore,
    history: HistoryLog,
    enabled: bool,
}

impl DriftDetector {
    /// Detector for the project at `root` with default settings.
    pub fn new(root: &NormalizedPath) -> Self {
        Self::from_config(root, &GlobalConfig::default())
    }

    pub fn from_config(root: &NormalizedPath, config: &GlobalConfig) -> Self {
        let state_dir = root.join(RulesetsPath::StateDir.as_str());
        Self {
            snapshots: SnapshotStore::new(&state_dir),
            history: HistoryLog::new(config.history_path(root)),
            enabled: config.drift.enabled,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn snapshot(&self, path: &NormalizedPath) -> Option<DriftSnapshot> {
        self.snapshots.load(path)
    }

    /// Compare each destination file against its last snapshot.
    ///
    /// Files that do not exist and paths never recorded are not drift.
    /// Detected drifts are appended to the history log; a failed append is
    /// logged and the report is still returned.
    pub fn check_drift(&self, check: &DriftCheck) -> Result<DriftReport> {
        if !self.enabled {
            return Ok(DriftReport::default());
        }

        let source_hash = compute_content_checksum(&self.source_content(check)?);
        let mut drifts = Vec::new();

        for (destination, path) in &check.compiled_paths {
            let Some((compiled_hash, current)) = read_destination(path) else {
                continue;
            };
            let Some(snapshot) = self.snapshots.load(path) else {
                tracing::debug!(path = %path, "No snapshot, nothing to compare");
                continue;
            };

            if snapshot.hash == compiled_hash {
                continue;
            }

            tracing::info!(destination = %destination, path = %path, "Drift detected");
            drifts.push(DriftEntry {
                kind: DriftKind::ExternalModification,
                destination: destination.clone(),
                path: path.as_str().to_string(),
                source_hash: source_hash.clone(),
                compiled_hash,
                last_known_hash: snapshot.hash,
                diff: line_diff(&snapshot.content, &current),
                timestamp: Utc::now(),
            });
        }

        if !drifts.is_empty() {
            let entries: Vec<_> = drifts.iter().cloned().map(HistoryEntry::Drift).collect();
            if let Err(e) = self.history.append(&entries) {
                tracing::warn!(
                    path = %self.history.path(),
                    error = %e,
                    "Failed to append drift history"
                );
            }
        }

        Ok(DriftReport {
            has_drift: !drifts.is_empty(),
            drifts,
        })
    }

    /// Snapshot each destination file as the new baseline.
    pub fn record_compilation(&self, check: &DriftCheck) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let source = SourceRef {
            path: check.source_path.as_str().to_string(),
            hash: compute_content_checksum(&self.source_content(check)?),
        };
        let mut entries = Vec::new();

        for (destination, path) in &check.compiled_paths {
            let Some((hash, content)) = read_destination(path) else {
                continue;
            };
            let now = Utc::now();

            let snapshot = DriftSnapshot {
                path: path.as_str().to_string(),
                hash: hash.clone(),
                content,
                timestamp: now,
            };
            if let Err(e) = self.snapshots.store(&snapshot) {
                tracing::warn!(path = %path, error = %e, "Failed to store snapshot");
                continue;
            }

            entries.push(HistoryEntry::Compilation(CompilationEntry {
                timestamp: now,
                source: source.clone(),
                compiled: CompiledRef {
                    destination: destination.clone(),
                    path: path.as_str().to_string(),
                    hash,
                },
            }));
        }

        tracing::debug!(recorded = entries.len(), "Recorded compilation");
        self.history.append(&entries)
    }

    /// Past drifts matching `query`. Empty when disabled.
    pub fn drift_history(&self, query: &HistoryQuery) -> Vec<DriftEntry> {
        if !self.enabled {
            return Vec::new();
        }
        self.history.drifts(query)
    }

    fn source_content(&self, check: &DriftCheck) -> Result<String> {
        if let Some(content) = &check.source_content {
            return Ok(content.clone());
        }
        match io::read_optional_text(&check.source_path)? {
            Some(content) => Ok(content),
            None => {
                tracing::debug!(path = %check.source_path, "Source missing, hashing empty text");
                Ok(String::new())
            }
        }
    }
}

/// Hash of a destination file's bytes and its text for diffing.
///
/// Bytes that are not UTF-8 still hash exactly; the text is lossy.
/// `None` when missing or unreadable.
fn read_destination(path: &NormalizedPath) -> Option<(String, String)> {
    match io::read_optional_bytes(path) {
        Ok(Some(bytes)) => Some((
            compute_bytes_checksum(&bytes),
            String::from_utf8_lossy(&bytes).into_owned(),
        )),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Failed to read destination");
            None
        }
    }
}

//! Per-path content snapshots

use chrono::{DateTime, Utc};
use rulesets_fs::checksum::hex_digest;
use rulesets_fs::{ConfigStore, NormalizedPath, RulesetsPath, io};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Content of a destination file as last recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftSnapshot {
    pub path: String,
    pub hash: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Snapshots stored as `<state>/snapshots/<sha256(path)>.json`
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: NormalizedPath,
}

impl SnapshotStore {
    /// Store under the `.rulesets` state directory `state_dir`.
    pub fn new(state_dir: &NormalizedPath) -> Self {
        Self {
            dir: state_dir.join(RulesetsPath::SnapshotsDir.as_str()),
        }
    }

    /// Snapshot file for the destination at `path`.
    pub fn snapshot_path(&self, path: &NormalizedPath) -> NormalizedPath {
        self.dir.join(&format!("{}.json", hex_digest(path.as_str())))
    }

    /// Last snapshot of `path`; missing or unreadable snapshots are absent.
    pub fn load(&self, path: &NormalizedPath) -> Option<DriftSnapshot> {
        let snapshot_path = self.snapshot_path(path);
        let content = match io::read_optional_text(&snapshot_path) {
            Ok(content) => content?,
            Err(e) => {
                tracing::debug!(path = %snapshot_path, error = %e, "Unreadable snapshot");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::debug!(path = %snapshot_path, error = %e, "Corrupt snapshot");
                None
            }
        }
    }

    pub fn store(&self, snapshot: &DriftSnapshot) -> Result<()> {
        let target = self.snapshot_path(&NormalizedPath::new(&snapshot.path));
        ConfigStore::new().save(&target, snapshot)?;
        Ok(())
    }
}

//! Resolved command context
//!
//! Every command works on one project root and one rulesets home. The home
//! comes from `--home`, then `RULESETS_HOME`, then `~/.rulesets`. Without an
//! explicit home the global config may also come from the platform config
//! directories.

use std::collections::BTreeSet;
use std::path::Path;

use rulesets_core::config::resolve_home;
use rulesets_core::{DriftCheck, DriftDetector, GlobalConfig, RulesetStore, SyncCoordinator};
use rulesets_fs::NormalizedPath;

use crate::error::{CliError, Result};

#[derive(Debug, Clone)]
pub struct Context {
    pub root: NormalizedPath,
    pub home: NormalizedPath,
    pub config: GlobalConfig,
}

impl Context {
    pub fn resolve(project: Option<&Path>, home: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let root = match project {
            Some(project) => cwd.join(project),
            None => cwd.clone(),
        };
        if !root.is_dir() {
            return Err(CliError::user(format!(
                "Project directory does not exist: {}",
                root.display()
            )));
        }

        let (home, config) = match home {
            Some(home) => {
                let home = NormalizedPath::new(cwd.join(home));
                let config = GlobalConfig::load(&home);
                (home, config)
            }
            None => {
                let home = resolve_home().ok_or_else(|| {
                    CliError::user("Cannot determine the rulesets home; set RULESETS_HOME")
                })?;
                let config = GlobalConfig::discover(&home);
                (home, config)
            }
        };
        tracing::debug!(root = %root.display(), home = %home, "Resolved context");

        Ok(Self {
            root: NormalizedPath::new(root),
            home,
            config,
        })
    }

    pub fn store(&self) -> RulesetStore {
        RulesetStore::new(self.home.clone())
    }

    pub fn coordinator(&self) -> SyncCoordinator {
        SyncCoordinator::new(self.root.clone(), self.store())
    }

    pub fn drift_detector(&self) -> DriftDetector {
        DriftDetector::from_config(&self.root, &self.config)
    }

    /// Destinations to use when a command names none.
    pub fn destinations_or_default(&self, destinations: Vec<String>) -> Vec<String> {
        if destinations.is_empty() {
            vec![self.config.rulesets.default_destination.clone()]
        } else {
            destinations
        }
    }

    /// Drift check covering the destinations of `name`.
    pub fn drift_check(
        &self,
        coordinator: &SyncCoordinator,
        name: &str,
        destinations: &[String],
    ) -> DriftCheck {
        let store = coordinator.store();
        destinations
            .iter()
            .filter_map(|id| coordinator.destination_path(id).map(|path| (id, path)))
            .fold(DriftCheck::new(store.rules_path(name)), |check, (id, path)| {
                check.with_destination(id.as_str(), path)
            })
    }

    /// Record the current content of each destination as the drift baseline.
    pub fn record_baseline(
        &self,
        coordinator: &SyncCoordinator,
        name: &str,
        destinations: &[String],
    ) -> Result<()> {
        let detector = self.drift_detector();
        if !detector.is_enabled() {
            return Ok(());
        }
        detector.record_compilation(&self.drift_check(coordinator, name, destinations))?;
        Ok(())
    }

    /// One drift check per installed ruleset, each destination file once.
    pub fn installed_drift_checks(&self, coordinator: &SyncCoordinator) -> Vec<DriftCheck> {
        let mut seen = BTreeSet::new();
        coordinator
            .installed()
            .into_iter()
            .filter_map(|(name, record)| {
                let fresh: Vec<String> = record
                    .destinations
                    .into_iter()
                    .filter(|id| seen.insert(id.clone()))
                    .collect();
                (!fresh.is_empty()).then(|| self.drift_check(coordinator, &name, &fresh))
            })
            .collect()
    }
}

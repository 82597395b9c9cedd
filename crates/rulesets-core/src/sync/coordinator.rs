//! The synchronization coordinator

use std::collections::BTreeMap;

use chrono::Utc;
use rulesets_fs::NormalizedPath;
use rulesets_fs::checksum::compute_content_checksum;

use super::conflict::write_conflict_artifact;
use super::report::{
    InstallOptions, InstallResult, RemoveOptions, RemoveResult, SyncOptions, SyncResult,
    UpdateInfo, UpdateResult,
};
use crate::compose::{ComposedRuleset, CompositionEngine};
use crate::destination::DestinationRegistry;
use crate::ledger::{InstallationRecord, Ledger, Modification, apply_modifications};
use crate::ruleset::RulesetStore;
use crate::{Error, Result};

/// Destinations touched by one write pass
#[derive(Debug, Default)]
struct WriteOutcome {
    written: Vec<String>,
    skipped: Vec<String>,
    failed: Vec<(String, Error)>,
}

impl WriteOutcome {
    fn failure_summary(&self) -> String {
        self.failed
            .iter()
            .map(|(_, error)| error.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn has_failed(&self, id: &str) -> bool {
        self.failed.iter().any(|(failed, _)| failed == id)
    }
}

/// Region content per destination id before a write; `None` when absent.
type PriorRegions = BTreeMap<String, Option<String>>;

/// Orchestrates install, update, remove and sync for one project.
#[derive(Debug)]
pub struct SyncCoordinator {
    root: NormalizedPath,
    engine: CompositionEngine,
    destinations: DestinationRegistry,
}

impl SyncCoordinator {
    /// Coordinator for the project at `root`, reading rulesets from `store`.
    pub fn new(root: NormalizedPath, store: RulesetStore) -> Self {
        Self {
            root,
            engine: CompositionEngine::new(store),
            destinations: DestinationRegistry::new(),
        }
    }

    pub fn with_destinations(mut self, destinations: DestinationRegistry) -> Self {
        self.destinations = destinations;
        self
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn store(&self) -> &RulesetStore {
        self.engine.store()
    }

    pub fn engine_mut(&mut self) -> &mut CompositionEngine {
        &mut self.engine
    }

    pub fn destinations(&self) -> &DestinationRegistry {
        &self.destinations
    }

    /// Absolute file path of destination `id` in this project.
    pub fn destination_path(&self, id: &str) -> Option<NormalizedPath> {
        self.destinations.path_for(&self.root, id)
    }

    pub fn ledger_path(&self) -> NormalizedPath {
        Ledger::path_for(&self.root)
    }

    /// Current ledger as stored on disk.
    pub fn load_ledger(&self) -> Ledger {
        Ledger::load(&self.ledger_path())
    }

    fn save_ledger(&self, ledger: &Ledger) -> Result<()> {
        ledger.save(&self.ledger_path())
    }

    /// Compose `name` and write it to `destinations`.
    ///
    /// Fails without touching any file when the ruleset is already installed
    /// and `force` is not set. Per-ruleset problems are reported in the
    /// result; only a failure to persist the ledger is returned as an error.
    pub fn install_ruleset(
        &mut self,
        name: &str,
        destinations: &[String],
        options: &InstallOptions,
    ) -> Result<InstallResult> {
        let mut ledger = self.load_ledger();
        let result = self.install_into(&mut ledger, name, destinations, options)?;
        if !result.installed_to.is_empty() {
            self.save_ledger(&ledger)?;
        }
        Ok(result)
    }

    /// Install several rulesets, one result per name in input order.
    pub fn install_rulesets(
        &mut self,
        names: &[String],
        destinations: &[String],
        options: &InstallOptions,
    ) -> Result<Vec<InstallResult>> {
        let mut ledger = self.load_ledger();
        let mut results = Vec::with_capacity(names.len());
        for name in names {
            results.push(self.install_into(&mut ledger, name, destinations, options)?);
        }
        if results.iter().any(|r| !r.installed_to.is_empty()) {
            self.save_ledger(&ledger)?;
        }
        Ok(results)
    }

    fn install_into(
        &mut self,
        ledger: &mut Ledger,
        name: &str,
        destinations: &[String],
        options: &InstallOptions,
    ) -> Result<InstallResult> {
        if !options.force && ledger.is_installed(name) {
            return Ok(InstallResult::failure(
                name,
                format!("Ruleset '{name}' is already installed; use force to reinstall"),
            ));
        }

        let modifications = if options.preserve_local {
            ledger.modifications(name).to_vec()
        } else {
            Vec::new()
        };

        let (composed, content) = match self.prepare(name, &modifications) {
            Ok(prepared) => prepared,
            Err(e) if e.is_recoverable() => {
                tracing::warn!(ruleset = name, error = %e, "Install failed");
                return Ok(InstallResult::failure(name, e.to_string()));
            }
            Err(e) => return Err(e),
        };
        self.warn_missing_requirements(name);

        let outcome = self.write_destinations(name, destinations, &content);
        if outcome.written.is_empty() {
            let reason = if outcome.failed.is_empty() {
                format!("No known destinations in [{}]", destinations.join(", "))
            } else {
                outcome.failure_summary()
            };
            return Ok(InstallResult {
                skipped: outcome.skipped,
                ..InstallResult::failure(name, reason)
            });
        }

        let mut tracked = outcome.written.clone();
        let previous = ledger.get(name).cloned();
        if let Some(previous) = &previous {
            tracked.extend(self.retire_destinations(name, &previous.destinations, &outcome));
        }

        let mut record = InstallationRecord::new(
            composed.version(),
            self.engine.store().source(),
            tracked,
        )
        .with_checksum(compute_content_checksum(&content));
        if let Some(previous) = previous {
            record.installed_at = previous.installed_at;
            record.last_sync = Some(Utc::now());
        }
        ledger.set(name, record);

        tracing::info!(
            ruleset = name,
            version = composed.version(),
            destinations = ?outcome.written,
            "Installed ruleset"
        );

        let reason = (!outcome.failed.is_empty()).then(|| outcome.failure_summary());
        Ok(InstallResult {
            name: name.to_string(),
            success: outcome.failed.is_empty(),
            installed_to: outcome.written,
            skipped: outcome.skipped,
            version: Some(composed.version().to_string()),
            reason,
        })
    }

    /// Excise `name` from previously recorded destinations a reinstall did
    /// not write. Returns the ones that must stay in the record: those whose
    /// write failed and those that could not be excised.
    fn retire_destinations(
        &self,
        name: &str,
        previous: &[String],
        outcome: &WriteOutcome,
    ) -> Vec<String> {
        let mut kept = Vec::new();
        for id in previous {
            if outcome.written.contains(id) || kept.contains(id) {
                continue;
            }
            if outcome.has_failed(id) {
                kept.push(id.clone());
                continue;
            }
            let Some(writer) = self.destinations.get(id) else {
                tracing::warn!(ruleset = name, destination = %id, "Unknown destination left in record");
                kept.push(id.clone());
                continue;
            };
            match writer.remove(&self.root, name) {
                Ok(removal) => {
                    tracing::info!(ruleset = name, destination = %id, ?removal, "Retired destination");
                }
                Err(e) => {
                    tracing::warn!(ruleset = name, destination = %id, error = %e, "Cannot retire destination");
                    kept.push(id.clone());
                }
            }
        }
        kept
    }

    /// Installed rulesets whose source version differs from the recorded one.
    ///
    /// Recomposes from source; names that no longer compose are skipped.
    pub fn check_for_updates(&mut self) -> Vec<UpdateInfo> {
        let ledger = self.load_ledger();
        self.engine.invalidate();

        let mut updates = Vec::new();
        for name in ledger.names() {
            if let Some(update) = self.check_ruleset_update(&ledger, &name) {
                updates.push(update);
            }
        }
        updates
    }

    fn check_ruleset_update(&mut self, ledger: &Ledger, name: &str) -> Option<UpdateInfo> {
        let record = ledger.get(name)?;
        match self.engine.compose(name) {
            Ok(composed) if composed.version() != record.version => Some(UpdateInfo {
                name: name.to_string(),
                current_version: record.version.clone(),
                available_version: composed.version().to_string(),
            }),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(ruleset = name, error = %e, "Cannot check for updates");
                None
            }
        }
    }

    /// Rewrite every installed ruleset that has an update available.
    ///
    /// With `preserve_local`, tracked modifications are reapplied; when they
    /// no longer apply the destinations are left alone and a conflict
    /// artifact is written instead.
    pub fn sync_installed_rulesets(&mut self, options: &SyncOptions) -> Result<SyncResult> {
        let mut ledger = self.load_ledger();
        self.engine.invalidate();

        let names = match &options.only {
            Some(only) => only.clone(),
            None => ledger.names(),
        };

        let mut result = SyncResult::default();
        let mut changed = false;
        for name in &names {
            if !ledger.is_installed(name) {
                tracing::debug!(ruleset = %name, "Not installed, skipping sync");
                continue;
            }
            if self.check_ruleset_update(&ledger, name).is_none() {
                continue;
            }

            match self.sync_one(&mut ledger, name, options.preserve_local) {
                Ok(preserved) => {
                    changed = true;
                    result.updated.push(name.clone());
                    if preserved {
                        result.preserved.push(name.clone());
                    }
                }
                Err(Error::Conflict { .. }) => result.conflicts.push(name.clone()),
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(ruleset = %name, error = %e, "Sync failed");
                    result.failed.push(name.clone());
                }
                Err(e) => return Err(e),
            }
        }

        if changed {
            self.save_ledger(&ledger)?;
        }
        tracing::info!(
            updated = result.updated.len(),
            conflicts = result.conflicts.len(),
            failed = result.failed.len(),
            "Sync complete"
        );
        Ok(result)
    }

    /// Returns whether modifications were reapplied.
    ///
    /// All recorded destinations are rewritten or none are: when one write
    /// fails, the destinations already written get their prior region back.
    fn sync_one(&mut self, ledger: &mut Ledger, name: &str, preserve_local: bool) -> Result<bool> {
        let modifications = if preserve_local {
            ledger.modifications(name).to_vec()
        } else {
            Vec::new()
        };
        let (composed, content) = self.prepare(name, &modifications)?;

        let Some(destinations) = ledger.get(name).map(|record| record.destinations.clone()) else {
            return Ok(false);
        };
        let prior = self.read_regions(name, &destinations);
        let outcome = self.write_destinations(name, &destinations, &content);
        if let Some((_, error)) = outcome.failed.into_iter().next() {
            self.restore_regions(name, &outcome.written, &prior);
            return Err(error);
        }

        let Some(record) = ledger.get_mut(name) else {
            return Ok(false);
        };
        record.version = composed.version().to_string();
        record.last_sync = Some(Utc::now());
        record.checksum = Some(compute_content_checksum(&content));
        tracing::info!(ruleset = name, version = %record.version, "Synced ruleset");

        Ok(!modifications.is_empty())
    }

    /// Reinstall `name` at its recorded destinations when an update exists.
    pub fn update_ruleset(&mut self, name: &str) -> Result<UpdateResult> {
        let ledger = self.load_ledger();
        let Some(record) = ledger.get(name) else {
            return Ok(UpdateResult::failure(
                name,
                format!("Ruleset '{name}' is not installed"),
            ));
        };
        let destinations = record.destinations.clone();

        self.engine.invalidate();
        let Some(update) = self.check_ruleset_update(&ledger, name) else {
            return Ok(UpdateResult::failure(
                name,
                format!("Ruleset '{name}' is already up to date"),
            ));
        };

        let options = InstallOptions {
            force: true,
            preserve_local: true,
        };
        let install = self.install_ruleset(name, &destinations, &options)?;

        Ok(UpdateResult {
            name: name.to_string(),
            success: install.success,
            previous_version: Some(update.current_version),
            new_version: install.success.then_some(update.available_version),
            reason: install.reason,
        })
    }

    /// Excise `name` from its destinations and update the ledger.
    ///
    /// Destination files left empty are deleted, followed by their parent
    /// directory when it is empty too.
    pub fn remove_ruleset(&mut self, name: &str, options: &RemoveOptions) -> Result<RemoveResult> {
        let mut ledger = self.load_ledger();
        let Some(record) = ledger.get(name).cloned() else {
            return Ok(RemoveResult::failure(
                name,
                format!("Ruleset '{name}' is not installed"),
            ));
        };

        let targets = options
            .destinations
            .clone()
            .unwrap_or_else(|| record.destinations.clone());

        let mut removed_from = Vec::new();
        let mut errors = Vec::new();
        let mut kept = Vec::new();
        for id in &targets {
            let Some(writer) = self.destinations.get(id) else {
                tracing::warn!(destination = %id, "Unknown destination, skipping");
                continue;
            };
            match writer.remove(&self.root, name) {
                Ok(outcome) if outcome.removed() => removed_from.push(id.clone()),
                Ok(outcome) => {
                    tracing::debug!(ruleset = name, destination = %id, ?outcome, "Nothing to remove");
                }
                Err(source) => {
                    let error = Error::Destination {
                        destination: id.clone(),
                        source,
                    };
                    tracing::warn!(ruleset = name, error = %error, "Remove failed");
                    errors.push(error.to_string());
                    kept.push(id.clone());
                }
            }
        }

        let remaining: Vec<String> = record
            .destinations
            .iter()
            .filter(|d| !targets.contains(d) || kept.contains(d))
            .cloned()
            .collect();
        if remaining.is_empty() {
            ledger.remove(name);
            tracing::info!(ruleset = name, "Removed ruleset");
        } else {
            ledger.set(
                name,
                InstallationRecord {
                    destinations: remaining,
                    ..record
                },
            );
            tracing::info!(ruleset = name, destinations = ?removed_from, "Removed ruleset from destinations");
        }
        self.save_ledger(&ledger)?;

        Ok(RemoveResult {
            name: name.to_string(),
            success: errors.is_empty(),
            removed_from,
            errors,
            reason: None,
        })
    }

    /// Record a local modification to reapply on later installs and syncs.
    pub fn track_modification(&self, name: &str, modification: Modification) -> Result<()> {
        let mut ledger = self.load_ledger();
        let modification = match modification.timestamp {
            Some(_) => modification,
            None => modification.at(Utc::now()),
        };
        ledger.push_modification(name, modification);
        self.save_ledger(&ledger)
    }

    pub fn modifications(&self, name: &str) -> Vec<Modification> {
        self.load_ledger().modifications(name).to_vec()
    }

    /// Forget the tracked modifications of `name`. Returns whether any existed.
    pub fn clear_modifications(&self, name: &str) -> Result<bool> {
        let mut ledger = self.load_ledger();
        let cleared = ledger.clear_modifications(name);
        if cleared {
            self.save_ledger(&ledger)?;
        }
        Ok(cleared)
    }

    pub fn installed(&self) -> BTreeMap<String, InstallationRecord> {
        self.load_ledger().installed().clone()
    }

    /// Compose `name` and apply `modifications`, writing a conflict artifact
    /// when they no longer apply.
    fn prepare(
        &mut self,
        name: &str,
        modifications: &[Modification],
    ) -> Result<(ComposedRuleset, String)> {
        let composed = self.engine.compose(name)?;
        if modifications.is_empty() {
            let content = composed.rules.clone();
            return Ok((composed, content));
        }

        match apply_modifications(&composed.rules, modifications) {
            Ok(content) => Ok((composed, content)),
            Err(source) => {
                write_conflict_artifact(&self.root, name, &composed.rules, modifications)?;
                Err(Error::Conflict {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }

    fn write_destinations(&self, name: &str, destinations: &[String], content: &str) -> WriteOutcome {
        let mut outcome = WriteOutcome::default();
        for id in destinations {
            if outcome.written.contains(id) || outcome.skipped.contains(id) {
                continue;
            }
            let Some(writer) = self.destinations.get(id) else {
                tracing::warn!(destination = %id, "Unknown destination, skipping");
                outcome.skipped.push(id.clone());
                continue;
            };
            match writer.write(&self.root, name, content) {
                Ok(path) => {
                    tracing::debug!(ruleset = name, destination = %id, path = %path, "Wrote destination");
                    outcome.written.push(id.clone());
                }
                Err(source) => {
                    let error = Error::Destination {
                        destination: id.clone(),
                        source,
                    };
                    tracing::warn!(ruleset = name, error = %error, "Destination write failed");
                    outcome.failed.push((id.clone(), error));
                }
            }
        }
        outcome
    }

    fn read_regions(&self, name: &str, destinations: &[String]) -> PriorRegions {
        let mut prior = PriorRegions::new();
        for id in destinations {
            let Some(writer) = self.destinations.get(id) else {
                continue;
            };
            match writer.read(&self.root, name) {
                Ok(region) => {
                    prior.insert(id.clone(), region);
                }
                Err(e) => {
                    tracing::debug!(ruleset = name, destination = %id, error = %e, "Cannot read prior region");
                }
            }
        }
        prior
    }

    /// Put back the regions captured by [`read_regions`](Self::read_regions)
    /// for each id in `written`.
    fn restore_regions(&self, name: &str, written: &[String], prior: &PriorRegions) {
        for id in written {
            let (Some(writer), Some(region)) = (self.destinations.get(id), prior.get(id)) else {
                tracing::warn!(ruleset = name, destination = %id, "No prior region to restore");
                continue;
            };
            let restored = match region {
                Some(content) => writer.write(&self.root, name, content).map(|_| ()),
                None => writer.remove(&self.root, name).map(|_| ()),
            };
            match restored {
                Ok(()) => tracing::debug!(ruleset = name, destination = %id, "Restored prior region"),
                Err(e) => {
                    tracing::warn!(ruleset = name, destination = %id, error = %e, "Failed to restore region");
                }
            }
        }
    }

    fn warn_missing_requirements(&self, name: &str) {
        match self.engine.store().missing_requirements(name) {
            Ok(missing) => {
                for required in missing {
                    tracing::warn!(ruleset = name, requires = %required, "Required ruleset not found");
                }
            }
            Err(e) => tracing::debug!(ruleset = name, error = %e, "Could not check requirements"),
        }
    }
}

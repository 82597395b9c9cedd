//! Install, update, sync and remove lifecycle tests

use pretty_assertions::assert_eq;
use rulesets_blocks::RemoveOutcome;
use rulesets_core::{
    DestinationRegistry, DestinationWriter, InstallOptions, Modification, RegionFileDestination,
    RemoveOptions, RulesetSource, RulesetStore, SyncCoordinator, SyncOptions, UpdateInfo,
};
use rulesets_fs::NormalizedPath;
use rulesets_test_utils::TestProject;

const CLAUDE: &str = ".claude/CLAUDE.md";
const CURSOR: &str = ".cursor/rules/ruleset.md";

fn coordinator(project: &TestProject) -> SyncCoordinator {
    SyncCoordinator::new(project.root_path(), RulesetStore::new(project.home_path()))
}

fn dests(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/// `flaky` destination writing `FLAKY.md` that refuses one ruleset.
#[derive(Debug)]
struct RejectingDestination {
    inner: RegionFileDestination,
    rejects: &'static str,
}

impl DestinationWriter for RejectingDestination {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn relative_path(&self) -> &str {
        self.inner.relative_path()
    }

    fn write(
        &self,
        root: &NormalizedPath,
        ruleset: &str,
        content: &str,
    ) -> rulesets_blocks::Result<NormalizedPath> {
        if ruleset == self.rejects {
            let path = self.path(root).to_native();
            let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
            return Err(rulesets_fs::Error::io(path, denied).into());
        }
        self.inner.write(root, ruleset, content)
    }

    fn read(&self, root: &NormalizedPath, ruleset: &str) -> rulesets_blocks::Result<Option<String>> {
        self.inner.read(root, ruleset)
    }

    fn remove(&self, root: &NormalizedPath, ruleset: &str) -> rulesets_blocks::Result<RemoveOutcome> {
        self.inner.remove(root, ruleset)
    }
}

/// Coordinator with an extra `flaky` destination refusing `rejects`.
fn flaky_coordinator(project: &TestProject, rejects: &'static str) -> SyncCoordinator {
    let mut registry = DestinationRegistry::new();
    registry.register(Box::new(RejectingDestination {
        inner: RegionFileDestination::new("flaky", "FLAKY.md"),
        rejects,
    }));
    coordinator(project).with_destinations(registry)
}

/// Swap a destination file for a directory so writes to it fail.
fn break_destination(project: &TestProject, rel: &str) {
    let path = project.project_file(rel);
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();
}

fn install(coordinator: &mut SyncCoordinator, name: &str, ids: &[&str]) {
    let result = coordinator
        .install_ruleset(name, &dests(ids), &InstallOptions::default())
        .unwrap();
    assert!(result.success, "install failed: {:?}", result.reason);
}

#[test]
fn test_install_writes_region_and_records_ledger() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    project.write_ruleset("react", "2.0.0", &["base"], "React rules.");
    let mut coordinator = coordinator(&project);

    let result = coordinator
        .install_ruleset("react", &dests(&["claude-code", "cursor"]), &InstallOptions::default())
        .unwrap();

    assert!(result.success);
    assert_eq!(result.installed_to, vec!["claude-code", "cursor"]);
    assert_eq!(result.version.as_deref(), Some("2.0.0"));
    project.assert_file_contains(CLAUDE, "<!-- rulesets:begin react -->");
    project.assert_file_contains(CLAUDE, "Base rules.\n\nReact rules.");
    project.assert_file_contains(CURSOR, "React rules.");

    let installed = coordinator.installed();
    let record = &installed["react"];
    assert_eq!(record.version, "2.0.0");
    assert_eq!(record.source, RulesetSource::Global);
    assert_eq!(record.destinations, vec!["claude-code", "cursor"]);
    assert!(record.checksum.as_deref().unwrap().starts_with("sha256:"));
    project.assert_file_exists(".rulesets/installed.json");
}

#[test]
fn test_double_install_without_force_fails() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["claude-code"]);
    let before = project.read_project_file(CLAUDE);

    project.write_ruleset("base", "1.1.0", &[], "Changed rules.");
    let second = coordinator
        .install_ruleset("base", &dests(&["claude-code"]), &InstallOptions::default())
        .unwrap();

    assert!(!second.success);
    assert!(second.reason.unwrap().contains("already installed"));
    assert_eq!(project.read_project_file(CLAUDE), before);
}

#[test]
fn test_force_reinstall_overwrites_region() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Old rules.");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["agents-md"]);

    project.write_ruleset("base", "1.1.0", &[], "New rules.");
    coordinator.engine_mut().invalidate();
    let options = InstallOptions {
        force: true,
        ..InstallOptions::default()
    };
    let result = coordinator
        .install_ruleset("base", &dests(&["agents-md"]), &options)
        .unwrap();

    assert!(result.success);
    project.assert_file_contains("AGENTS.md", "New rules.");
    project.assert_file_not_contains("AGENTS.md", "Old rules.");
    let record = &coordinator.installed()["base"];
    assert_eq!(record.version, "1.1.0");
    assert!(record.last_sync.is_some());
}

#[test]
fn test_force_reinstall_elsewhere_retires_old_destination() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["claude-code"]);

    let options = InstallOptions {
        force: true,
        ..InstallOptions::default()
    };
    let result = coordinator
        .install_ruleset("base", &dests(&["agents-md"]), &options)
        .unwrap();

    assert!(result.success);
    assert_eq!(result.installed_to, vec!["agents-md"]);
    project.assert_file_not_exists(CLAUDE);
    assert_eq!(coordinator.installed()["base"].destinations, vec!["agents-md"]);

    coordinator
        .remove_ruleset("base", &RemoveOptions::default())
        .unwrap();
    project.assert_file_not_exists("AGENTS.md");
    project.assert_file_not_exists(CLAUDE);
    assert!(coordinator.installed().is_empty());
}

#[test]
fn test_force_reinstall_keeps_destination_whose_write_failed() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["claude-code", "cursor"]);
    break_destination(&project, CURSOR);

    let options = InstallOptions {
        force: true,
        ..InstallOptions::default()
    };
    let result = coordinator
        .install_ruleset("base", &dests(&["claude-code", "cursor"]), &options)
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.installed_to, vec!["claude-code"]);
    assert!(result.reason.as_deref().unwrap().contains("cursor"));
    assert_eq!(
        coordinator.installed()["base"].destinations,
        vec!["claude-code", "cursor"]
    );
}

#[test]
fn test_install_rejects_rules_holding_a_delimiter_line() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Intro\n<!-- rulesets:end base -->\nTail");
    let mut coordinator = coordinator(&project);

    let result = coordinator
        .install_ruleset("base", &dests(&["claude-code"]), &InstallOptions::default())
        .unwrap();

    assert!(!result.success);
    assert!(result.reason.as_deref().unwrap().contains("region delimiter"));
    project.assert_file_not_exists(CLAUDE);
    assert!(coordinator.installed().is_empty());
}

#[test]
fn test_batch_install_continues_past_rejected_destination() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    project.write_ruleset("style", "1.0.0", &[], "Style rules.");
    let mut coordinator = flaky_coordinator(&project, "style");

    let results = coordinator
        .install_rulesets(
            &dests(&["style", "base"]),
            &dests(&["agents-md", "flaky"]),
            &InstallOptions::default(),
        )
        .unwrap();

    assert!(!results[0].success);
    assert_eq!(results[0].installed_to, vec!["agents-md"]);
    assert!(results[0].reason.as_deref().unwrap().contains("flaky"));
    assert!(results[1].success);
    assert_eq!(results[1].installed_to, vec!["agents-md", "flaky"]);

    project.assert_file_contains("AGENTS.md", "Style rules.");
    project.assert_file_contains("FLAKY.md", "Base rules.");
    project.assert_file_not_contains("FLAKY.md", "Style rules.");
    let installed = coordinator.installed();
    assert_eq!(installed["style"].destinations, vec!["agents-md"]);
    assert_eq!(installed["base"].destinations, vec!["agents-md", "flaky"]);
}

#[test]
fn test_two_rulesets_share_a_destination() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    project.write_ruleset("style", "1.0.0", &[], "Style rules.");
    let mut coordinator = coordinator(&project);

    install(&mut coordinator, "base", &["agents-md"]);
    install(&mut coordinator, "style", &["agents-md"]);
    coordinator
        .remove_ruleset("base", &RemoveOptions::default())
        .unwrap();

    project.assert_file_contains("AGENTS.md", "Style rules.");
    project.assert_file_not_contains("AGENTS.md", "Base rules.");
}

#[test]
fn test_unknown_destination_is_skipped() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    let mut coordinator = coordinator(&project);

    let result = coordinator
        .install_ruleset("base", &dests(&["emacs", "cursor"]), &InstallOptions::default())
        .unwrap();

    assert!(result.success);
    assert_eq!(result.installed_to, vec!["cursor"]);
    assert_eq!(result.skipped, vec!["emacs"]);
    assert_eq!(coordinator.installed()["base"].destinations, vec!["cursor"]);
}

#[test]
fn test_only_unknown_destinations_is_failure() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    let mut coordinator = coordinator(&project);

    let result = coordinator
        .install_ruleset("base", &dests(&["emacs"]), &InstallOptions::default())
        .unwrap();

    assert!(!result.success);
    assert!(coordinator.installed().is_empty());
}

#[test]
fn test_batch_install_reports_each_name() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    project.write_ruleset("a", "1.0.0", &["b"], "A");
    project.write_ruleset("b", "1.0.0", &["a"], "B");
    let mut coordinator = coordinator(&project);

    let names = dests(&["ghost", "a", "base"]);
    let results = coordinator
        .install_rulesets(&names, &dests(&["agents-md"]), &InstallOptions::default())
        .unwrap();

    let outcome: Vec<(&str, bool)> = results
        .iter()
        .map(|r| (r.name.as_str(), r.success))
        .collect();
    assert_eq!(outcome, vec![("ghost", false), ("a", false), ("base", true)]);
    assert!(results[1].reason.as_deref().unwrap().contains("Circular dependency"));
    assert_eq!(coordinator.installed().len(), 1);
}

#[test]
fn test_check_for_updates_detects_version_bump() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["claude-code"]);

    assert!(coordinator.check_for_updates().is_empty());

    project.write_ruleset("base", "1.1.0", &[], "Base rules, revised.");
    assert_eq!(
        coordinator.check_for_updates(),
        vec![UpdateInfo {
            name: "base".into(),
            current_version: "1.0.0".into(),
            available_version: "1.1.0".into(),
        }]
    );
}

#[test]
fn test_check_for_updates_skips_vanished_source() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["claude-code"]);

    std::fs::remove_dir_all(project.ruleset_dir("base")).unwrap();
    assert!(coordinator.check_for_updates().is_empty());
}

#[test]
fn test_sync_updates_changed_rulesets_only() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base v1.");
    project.write_ruleset("style", "1.0.0", &[], "Style v1.");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["claude-code"]);
    install(&mut coordinator, "style", &["claude-code"]);

    project.write_ruleset("base", "2.0.0", &[], "Base v2.");
    let result = coordinator
        .sync_installed_rulesets(&SyncOptions::default())
        .unwrap();

    assert_eq!(result.updated, vec!["base"]);
    assert!(result.is_clean());
    assert!(result.preserved.is_empty());
    project.assert_file_contains(CLAUDE, "Base v2.");
    project.assert_file_contains(CLAUDE, "Style v1.");

    let record = &coordinator.installed()["base"];
    assert_eq!(record.version, "2.0.0");
    assert!(record.last_sync.is_some());
}

#[test]
fn test_sync_write_failure_restores_written_destinations() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base v1.");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["claude-code", "cursor"]);
    let before = project.read_project_file(CLAUDE);
    break_destination(&project, CURSOR);

    project.write_ruleset("base", "2.0.0", &[], "Base v2.");
    let result = coordinator
        .sync_installed_rulesets(&SyncOptions::default())
        .unwrap();

    assert_eq!(result.failed, vec!["base"]);
    assert!(result.updated.is_empty());
    assert!(!result.is_clean());
    assert_eq!(project.read_project_file(CLAUDE), before);
    assert_eq!(coordinator.installed()["base"].version, "1.0.0");
}

#[test]
fn test_sync_write_failure_removes_region_it_created() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base v1.");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["claude-code", "cursor"]);
    std::fs::remove_file(project.project_file(CLAUDE)).unwrap();
    break_destination(&project, CURSOR);

    project.write_ruleset("base", "2.0.0", &[], "Base v2.");
    let result = coordinator
        .sync_installed_rulesets(&SyncOptions::default())
        .unwrap();

    assert_eq!(result.failed, vec!["base"]);
    project.assert_file_not_exists(CLAUDE);
}

#[test]
fn test_sync_continues_past_rejected_destination() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base v1.");
    project.write_ruleset("style", "1.0.0", &[], "Style v1.");
    let mut setup = flaky_coordinator(&project, "");
    install(&mut setup, "style", &["agents-md", "flaky"]);
    install(&mut setup, "base", &["agents-md", "flaky"]);

    project.write_ruleset("base", "2.0.0", &[], "Base v2.");
    project.write_ruleset("style", "2.0.0", &[], "Style v2.");
    let mut coordinator = flaky_coordinator(&project, "style");
    let result = coordinator
        .sync_installed_rulesets(&SyncOptions::default())
        .unwrap();

    assert_eq!(result.updated, vec!["base"]);
    assert_eq!(result.failed, vec!["style"]);
    project.assert_file_contains("AGENTS.md", "Base v2.");
    project.assert_file_contains("AGENTS.md", "Style v1.");
    project.assert_file_not_contains("AGENTS.md", "Style v2.");
    project.assert_file_contains("FLAKY.md", "Base v2.");

    let installed = coordinator.installed();
    assert_eq!(installed["base"].version, "2.0.0");
    assert_eq!(installed["style"].version, "1.0.0");
}

#[test]
fn test_sync_only_filter() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base v1.");
    project.write_ruleset("style", "1.0.0", &[], "Style v1.");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["cursor"]);
    install(&mut coordinator, "style", &["cursor"]);

    project.write_ruleset("base", "2.0.0", &[], "Base v2.");
    project.write_ruleset("style", "2.0.0", &[], "Style v2.");
    let options = SyncOptions {
        only: Some(dests(&["style", "not-installed"])),
        ..SyncOptions::default()
    };
    let result = coordinator.sync_installed_rulesets(&options).unwrap();

    assert_eq!(result.updated, vec!["style"]);
    project.assert_file_contains(CURSOR, "Base v1.");
    project.assert_file_contains(CURSOR, "Style v2.");
}

#[test]
fn test_sync_preserve_local_reapplies_modifications() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Indent with tabs.");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["claude-code"]);
    coordinator
        .track_modification("base", Modification::replace("claude-code", "tabs", "", "spaces"))
        .unwrap();
    coordinator
        .track_modification("base", Modification::append("claude-code", "\n\nLocal note."))
        .unwrap();

    project.write_ruleset("base", "1.1.0", &[], "Indent with tabs. Wrap at 100.");
    let options = SyncOptions {
        preserve_local: true,
        ..SyncOptions::default()
    };
    let result = coordinator.sync_installed_rulesets(&options).unwrap();

    assert_eq!(result.updated, vec!["base"]);
    assert_eq!(result.preserved, vec!["base"]);
    project.assert_file_contains(CLAUDE, "Indent with spaces. Wrap at 100.\n\nLocal note.");
}

#[test]
fn test_sync_conflict_leaves_destinations_and_writes_artifact() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Indent with tabs.");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["claude-code"]);
    coordinator
        .track_modification("base", Modification::replace("claude-code", "tabs", "", "spaces"))
        .unwrap();

    project.write_ruleset("base", "2.0.0", &[], "Indentation is up to the formatter.");
    let options = SyncOptions {
        preserve_local: true,
        ..SyncOptions::default()
    };
    let result = coordinator.sync_installed_rulesets(&options).unwrap();

    assert_eq!(result.conflicts, vec!["base"]);
    assert!(result.updated.is_empty());
    project.assert_file_contains(CLAUDE, "Indent with tabs.");
    project.assert_file_contains(".rulesets/conflicts/base.md", "Indentation is up to the formatter.");
    project.assert_file_contains(".rulesets/conflicts/base.md", "rulesets clear-mods base");
    assert_eq!(coordinator.installed()["base"].version, "1.0.0");
}

#[test]
fn test_clear_modifications_resolves_conflict() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Indent with tabs.");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["claude-code"]);
    coordinator
        .track_modification("base", Modification::replace("claude-code", "tabs", "", "spaces"))
        .unwrap();
    project.write_ruleset("base", "2.0.0", &[], "No indentation rule.");

    assert!(coordinator.clear_modifications("base").unwrap());
    assert!(coordinator.modifications("base").is_empty());

    let options = SyncOptions {
        preserve_local: true,
        ..SyncOptions::default()
    };
    let result = coordinator.sync_installed_rulesets(&options).unwrap();
    assert_eq!(result.updated, vec!["base"]);
    project.assert_file_contains(CLAUDE, "No indentation rule.");
}

#[test]
fn test_track_modification_stamps_time() {
    let project = TestProject::new();
    let coordinator = coordinator(&project);

    coordinator
        .track_modification("base", Modification::prepend("cursor", "Header\n"))
        .unwrap();

    let mods = coordinator.modifications("base");
    assert_eq!(mods.len(), 1);
    assert!(mods[0].timestamp.is_some());
}

#[test]
fn test_update_ruleset() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base v1.");
    let mut coordinator = coordinator(&project);

    let missing = coordinator.update_ruleset("base").unwrap();
    assert!(!missing.success);
    assert!(missing.reason.unwrap().contains("not installed"));

    install(&mut coordinator, "base", &["cursor", "agents-md"]);
    let current = coordinator.update_ruleset("base").unwrap();
    assert!(!current.success);
    assert!(current.reason.unwrap().contains("up to date"));

    project.write_ruleset("base", "1.2.0", &[], "Base v1.2.");
    let updated = coordinator.update_ruleset("base").unwrap();
    assert!(updated.success);
    assert_eq!(updated.previous_version.as_deref(), Some("1.0.0"));
    assert_eq!(updated.new_version.as_deref(), Some("1.2.0"));
    project.assert_file_contains(CURSOR, "Base v1.2.");
    project.assert_file_contains("AGENTS.md", "Base v1.2.");
    assert_eq!(
        coordinator.installed()["base"].destinations,
        vec!["cursor", "agents-md"]
    );
}

#[test]
fn test_remove_deletes_record_file_and_directory() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["claude-code"]);
    coordinator
        .track_modification("base", Modification::append("claude-code", "x"))
        .unwrap();

    let result = coordinator
        .remove_ruleset("base", &RemoveOptions::default())
        .unwrap();

    assert!(result.success);
    assert_eq!(result.removed_from, vec!["claude-code"]);
    assert!(coordinator.installed().is_empty());
    assert!(coordinator.modifications("base").is_empty());
    project.assert_file_not_exists(CLAUDE);
    project.assert_file_not_exists(".claude");
}

#[test]
fn test_partial_remove_shrinks_record() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["claude-code", "agents-md"]);

    let options = RemoveOptions {
        destinations: Some(dests(&["agents-md"])),
    };
    let result = coordinator.remove_ruleset("base", &options).unwrap();

    assert_eq!(result.removed_from, vec!["agents-md"]);
    assert_eq!(coordinator.installed()["base"].destinations, vec!["claude-code"]);
    project.assert_file_not_exists("AGENTS.md");
    project.assert_file_contains(CLAUDE, "Base rules.");
}

#[test]
fn test_remove_not_installed() {
    let project = TestProject::new();
    let mut coordinator = coordinator(&project);

    let result = coordinator
        .remove_ruleset("base", &RemoveOptions::default())
        .unwrap();
    assert!(!result.success);
    assert!(result.reason.unwrap().contains("not installed"));
}

#[test]
fn test_remove_keeps_unmanaged_text() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    project.write_project_file("AGENTS.md", "# Hand-written notes\n");
    let mut coordinator = coordinator(&project);
    install(&mut coordinator, "base", &["agents-md"]);

    coordinator
        .remove_ruleset("base", &RemoveOptions::default())
        .unwrap();

    assert_eq!(project.read_project_file("AGENTS.md"), "# Hand-written notes\n");
}

#[test]
fn test_local_store_records_local_source() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    let store = RulesetStore::local(project.home_path());
    let mut coordinator = SyncCoordinator::new(project.root_path(), store);

    install(&mut coordinator, "base", &["agents-md"]);
    assert_eq!(coordinator.installed()["base"].source, RulesetSource::Local);
}

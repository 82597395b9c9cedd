//! Lifecycle Integration Tests
//!
//! Drive a project through install, drift detection, upstream changes,
//! conflicting local edits and removal using the library crates together.

use pretty_assertions::assert_eq;
use rulesets_blocks::RegionDocument;
use rulesets_core::{
    DriftCheck, DriftDetector, HistoryQuery, InstallOptions, Modification, RemoveOptions,
    RulesetStore, SyncCoordinator, SyncOptions,
};
use rulesets_test_utils::TestProject;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn coordinator(project: &TestProject) -> SyncCoordinator {
    SyncCoordinator::new(project.root_path(), RulesetStore::new(project.home_path()))
}

fn baseline_check(coordinator: &SyncCoordinator, name: &str, destinations: &[&str]) -> DriftCheck {
    destinations.iter().fold(
        DriftCheck::new(coordinator.store().rules_path(name)),
        |check, id| match coordinator.destination_path(id) {
            Some(path) => check.with_destination(*id, path),
            None => check,
        },
    )
}

fn dests(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

fn region(project: &TestProject, rel: &str, name: &str) -> Option<String> {
    let doc = RegionDocument::parse(&project.read_project_file(rel));
    doc.region(name).map(|r| r.content.clone())
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn full_lifecycle() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Be concise.");
    project.write_ruleset("react", "1.0.0", &["base"], "Prefer hooks.");
    project.write_project_file("AGENTS.md", "# Team notes\n");

    let mut coordinator = coordinator(&project);
    let detector = DriftDetector::new(&project.root_path());

    // Install into two tools and record the baseline.
    let result = coordinator
        .install_ruleset("react", &dests(&["agents-md", "claude-code"]), &InstallOptions::default())
        .unwrap();
    assert!(result.success);
    assert_eq!(result.installed_to, dests(&["agents-md", "claude-code"]));
    assert_eq!(
        region(&project, "AGENTS.md", "react").as_deref(),
        Some("Be concise.\n\nPrefer hooks.")
    );
    project.assert_file_contains("AGENTS.md", "# Team notes");

    let check = baseline_check(&coordinator, "react", &["agents-md", "claude-code"]);
    detector.record_compilation(&check).unwrap();
    assert!(!detector.check_drift(&check).unwrap().has_drift);

    // A hand edit in one tool file is drift.
    let edited = project.read_project_file(".claude/CLAUDE.md").replace("hooks", "classes");
    project.write_project_file(".claude/CLAUDE.md", &edited);
    let report = detector.check_drift(&check).unwrap();
    assert!(report.has_drift);
    assert_eq!(report.drifts.len(), 1);
    assert_eq!(report.drifts[0].destination, "claude-code");
    assert!(report.drifts[0].diff.contains("+Prefer classes."));

    // Keep the edit as a tracked modification.
    coordinator
        .track_modification(
            "react",
            Modification::replace("claude-code", "hooks", "", "classes"),
        )
        .unwrap();

    // Upstream bump of the parent is visible through the child.
    project.write_ruleset("base", "1.1.0", &[], "Be concise. Cite sources.");
    project.write_ruleset("react", "1.1.0", &["base"], "Prefer hooks.");
    let updates = coordinator.check_for_updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].available_version, "1.1.0");

    let sync = coordinator
        .sync_installed_rulesets(&SyncOptions {
            preserve_local: true,
            only: None,
        })
        .unwrap();
    assert_eq!(sync.updated, vec!["react".to_string()]);
    assert_eq!(sync.preserved, vec!["react".to_string()]);
    assert_eq!(
        region(&project, ".claude/CLAUDE.md", "react").as_deref(),
        Some("Be concise. Cite sources.\n\nPrefer classes.")
    );
    assert_eq!(
        coordinator.installed()["react"].version,
        "1.1.0".to_string()
    );

    // An upstream rewrite the modification no longer matches is a conflict.
    project.write_ruleset("react", "2.0.0", &["base"], "Use signals.");
    let sync = coordinator
        .sync_installed_rulesets(&SyncOptions {
            preserve_local: true,
            only: None,
        })
        .unwrap();
    assert_eq!(sync.conflicts, vec!["react".to_string()]);
    assert!(!sync.is_clean());
    project.assert_file_contains(".rulesets/conflicts/react.md", "# CONFLICT: react");
    project.assert_file_contains(".claude/CLAUDE.md", "Prefer classes.");
    assert_eq!(coordinator.installed()["react"].version, "1.1.0");

    // Remove everywhere: tool-only file goes, shared file keeps its notes.
    let removed = coordinator
        .remove_ruleset("react", &RemoveOptions::default())
        .unwrap();
    assert!(removed.success);
    project.assert_file_not_exists(".claude/CLAUDE.md");
    project.assert_file_not_exists(".claude");
    assert_eq!(project.read_project_file("AGENTS.md"), "# Team notes\n");
    assert!(coordinator.installed().is_empty());
    assert!(coordinator.modifications("react").is_empty());
}

#[test]
fn rulesets_sharing_a_file_keep_separate_regions() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");
    project.write_ruleset("testing", "1.0.0", &[], "Test rules.");

    let mut coordinator = coordinator(&project);
    let results = coordinator
        .install_rulesets(
            &dests(&["base", "testing"]),
            &dests(&["cursor"]),
            &InstallOptions::default(),
        )
        .unwrap();
    assert!(results.iter().all(|r| r.success));

    let doc = RegionDocument::parse(&project.read_project_file(".cursor/rules/ruleset.md"));
    assert_eq!(doc.region_names(), vec!["base", "testing"]);

    project.write_ruleset("base", "1.0.1", &[], "Base rules, revised.");
    let sync = coordinator
        .sync_installed_rulesets(&SyncOptions::default())
        .unwrap();
    assert_eq!(sync.updated, vec!["base".to_string()]);

    let doc = RegionDocument::parse(&project.read_project_file(".cursor/rules/ruleset.md"));
    assert_eq!(doc.region("base").unwrap().content, "Base rules, revised.");
    assert_eq!(doc.region("testing").unwrap().content, "Test rules.");

    coordinator
        .remove_ruleset("base", &RemoveOptions::default())
        .unwrap();
    let doc = RegionDocument::parse(&project.read_project_file(".cursor/rules/ruleset.md"));
    assert_eq!(doc.region_names(), vec!["testing"]);
}

#[test]
fn ledger_file_shape() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");

    let mut coordinator = coordinator(&project);
    coordinator
        .install_ruleset("base", &dests(&["agents-md"]), &InstallOptions::default())
        .unwrap();
    coordinator
        .track_modification("base", Modification::append("agents-md", "\nExtra."))
        .unwrap();

    let raw = project.read_project_file(".rulesets/installed.json");
    let ledger: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let record = &ledger["installed"]["base"];
    assert_eq!(record["version"], "1.0.0");
    assert_eq!(record["source"], "global");
    assert_eq!(record["destinations"], serde_json::json!(["agents-md"]));
    assert!(record["installedAt"].is_string());
    assert!(record["checksum"].as_str().unwrap().starts_with("sha256:"));

    let modification = &ledger["modified"]["base"][0];
    assert_eq!(modification["type"], "append");
    assert_eq!(modification["content"], "\nExtra.");
    assert_eq!(modification["destination"], "agents-md");
}

#[test]
fn drift_history_across_runs() {
    let project = TestProject::new();
    project.write_ruleset("base", "1.0.0", &[], "Base rules.");

    let mut coordinator = coordinator(&project);
    coordinator
        .install_ruleset("base", &dests(&["agents-md", "cursor"]), &InstallOptions::default())
        .unwrap();
    let check = baseline_check(&coordinator, "base", &["agents-md", "cursor"]);
    DriftDetector::new(&project.root_path())
        .record_compilation(&check)
        .unwrap();

    project.write_project_file("AGENTS.md", "replaced\n");
    project.write_project_file(".cursor/rules/ruleset.md", "replaced too\n");

    // A fresh detector reads the persisted snapshots.
    let detector = DriftDetector::new(&project.root_path());
    assert_eq!(detector.check_drift(&check).unwrap().drifts.len(), 2);

    let all = detector.drift_history(&HistoryQuery::default());
    assert_eq!(all.len(), 2);

    let cursor_only = detector.drift_history(&HistoryQuery {
        destination: Some("cursor".into()),
        ..HistoryQuery::default()
    });
    assert_eq!(cursor_only.len(), 1);
    assert_eq!(cursor_only[0].destination, "cursor");

    let last = detector.drift_history(&HistoryQuery {
        limit: 1,
        ..HistoryQuery::default()
    });
    assert_eq!(last.len(), 1);
}

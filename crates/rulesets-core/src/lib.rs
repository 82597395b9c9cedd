//! Composition and synchronization engine for rulesets
//!
//! A ruleset is a named, versioned block of instruction text that can extend
//! other rulesets. This crate resolves inheritance, installs the composed
//! text into per-tool destination files, tracks installations in a ledger,
//! synchronizes upstream changes while reapplying local modifications, and
//! detects out-of-band edits to installed files.
//!
//! # Architecture
//!
//! ```text
//!                 CLI
//!                  |
//!          SyncCoordinator ------------- DriftDetector
//!          /       |       \                   |
//! CompositionEngine Ledger DestinationRegistry  snapshots + history
//!        |                         |
//!  RulesetStore             rulesets-blocks
//!        |                         |
//!        +-------- rulesets-fs ----+
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rulesets_core::{InstallOptions, RulesetStore, SyncCoordinator};
//! use rulesets_fs::NormalizedPath;
//!
//! let store = RulesetStore::new(NormalizedPath::new("/home/me/.rulesets"));
//! let mut coordinator = SyncCoordinator::new(NormalizedPath::new("."), store);
//! let result = coordinator.install_ruleset(
//!     "typescript",
//!     &["claude-code".to_string()],
//!     &InstallOptions::default(),
//! )?;
//! assert!(result.success);
//! ```

pub mod compose;
pub mod config;
pub mod destination;
pub mod drift;
pub mod error;
pub mod ledger;
pub mod ruleset;
pub mod sync;

pub use compose::{ComposedRuleset, CompositionCache, CompositionEngine};
pub use config::GlobalConfig;
pub use destination::{DestinationRegistry, DestinationWriter, RegionFileDestination};
pub use drift::{
    DriftCheck, DriftDetector, DriftEntry, DriftReport, DriftSnapshot, HistoryEntry, HistoryQuery,
};
pub use error::{Error, Result};
pub use ledger::{
    ApplyError, InstallationRecord, Ledger, Modification, ModificationKind, ReplaceSpec,
    RulesetSource, apply_modifications,
};
pub use ruleset::{CreateRuleset, RulesetMetadata, RulesetStore, validate_ruleset_name};
pub use sync::{
    InstallOptions, InstallResult, RemoveOptions, RemoveResult, SyncCoordinator, SyncOptions,
    SyncResult, UpdateInfo, UpdateResult,
};

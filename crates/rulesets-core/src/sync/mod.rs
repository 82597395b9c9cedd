//! Install, update, remove and sync orchestration
//!
//! [`SyncCoordinator`] ties the composition engine, the ledger and the
//! destination writers together. Each operation reloads the ledger from
//! disk, works name by name in input order, and saves the ledger once at
//! the end. Problems that belong to one ruleset are reported in that
//! ruleset's result; only ledger persistence failures abort an operation.

mod conflict;
mod coordinator;
mod report;

pub use conflict::{conflict_artifact, write_conflict_artifact};
pub use coordinator::SyncCoordinator;
pub use report::{
    InstallOptions, InstallResult, RemoveOptions, RemoveResult, SyncOptions, SyncResult,
    UpdateInfo, UpdateResult,
};

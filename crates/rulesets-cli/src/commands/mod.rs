//! Command implementations for rulesets-cli

pub mod create;
pub mod drift;
pub mod install;
pub mod list;
pub mod remove;
pub mod sync;
pub mod track;

pub use create::run_create;
pub use drift::{run_drift_check, run_drift_history};
pub use install::run_install;
pub use list::run_list;
pub use remove::run_remove;
pub use sync::{run_outdated, run_sync, run_update};
pub use track::{Change, run_clear_mods, run_track};

//! Filesystem primitives for rulesets
//!
//! Provides normalized paths, atomic writes, permissive reads of optional
//! state files, SHA-256 checksums, and format-aware config loading.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::RulesetsPath;
pub use error::{Error, Result};
pub use path::NormalizedPath;

//! Ruleset sources
//!
//! A ruleset lives in `<home>/sets/<name>/` as `meta.toml` plus an optional
//! `rules.md`. [`RulesetStore`] loads and creates them.

mod metadata;
mod store;

pub use metadata::{Extends, Requires, RulesetMetadata, SetInfo};
pub use store::{CreateRuleset, RulesetStore};

use crate::{Error, Result};

/// Maximum length of a ruleset name
pub const MAX_NAME_LEN: usize = 64;

/// Validate a ruleset name.
///
/// Names become directory names and region markers, so path separators,
/// `..` and whitespace are rejected.
pub fn validate_ruleset_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(Error::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return invalid("name cannot be empty");
    }
    if name.len() > MAX_NAME_LEN {
        return invalid("name cannot exceed 64 characters");
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return invalid("name cannot contain path separators or '..'");
    }
    if name.starts_with('.') {
        return invalid("name cannot start with '.'");
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return invalid("only alphanumeric characters, '-', '_' and '.' are allowed");
    }
    Ok(())
}

//! `meta.toml` schema

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Version assumed when `[set] version` is absent
pub const DEFAULT_VERSION: &str = "1.0.0";

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

/// Parsed `meta.toml` of one ruleset
///
/// ```toml
/// [set]
/// name = "React"
/// version = "2.1.0"
///
/// [extends]
/// sets = ["typescript"]
///
/// [requires]
/// sets = ["testing"]
///
/// [overrides]
/// max_line_length = 100
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesetMetadata {
    #[serde(default)]
    pub set: SetInfo,
    #[serde(default, skip_serializing_if = "Extends::is_empty")]
    pub extends: Extends,
    #[serde(default, skip_serializing_if = "Requires::is_empty")]
    pub requires: Requires,
    /// Free-form settings; a child's keys win over its parents'
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetInfo {
    /// Display name; required
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Default for SetInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: default_version(),
            description: None,
            author: None,
            tags: Vec::new(),
        }
    }
}

/// Parents composed before this ruleset, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extends {
    #[serde(default)]
    pub sets: Vec<String>,
}

impl Extends {
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Rulesets expected to be installed alongside this one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requires {
    #[serde(default)]
    pub sets: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional: Vec<String>,
}

impl Requires {
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty() && self.optional.is_empty()
    }
}

impl RulesetMetadata {
    pub fn name(&self) -> &str {
        &self.set.name
    }

    pub fn version(&self) -> &str {
        &self.set.version
    }

    /// Names of the rulesets this one extends.
    pub fn parents(&self) -> &[String] {
        &self.extends.sets
    }
}

//! Filesystem-backed ruleset store

use rulesets_fs::{ConfigStore, NormalizedPath, RulesetsPath, io};

use super::metadata::{DEFAULT_VERSION, Extends, RulesetMetadata};
use super::validate_ruleset_name;
use crate::ledger::RulesetSource;
use crate::{Error, Result};

/// Input for [`RulesetStore::create`]
#[derive(Debug, Clone, Default)]
pub struct CreateRuleset {
    pub rules: String,
    pub extends: Vec<String>,
    /// Merged over the generated metadata; a non-empty `set.name` or
    /// `set.version` replaces the generated one.
    pub metadata: Option<RulesetMetadata>,
}

/// Reads ruleset sources from `<root>/sets/<name>/`.
#[derive(Debug, Clone)]
pub struct RulesetStore {
    root: NormalizedPath,
    source: RulesetSource,
}

impl RulesetStore {
    /// Store rooted at the global rulesets home.
    pub fn new(home: NormalizedPath) -> Self {
        Self {
            root: home,
            source: RulesetSource::Global,
        }
    }

    /// Store rooted at a project-local directory.
    pub fn local(root: NormalizedPath) -> Self {
        Self {
            root,
            source: RulesetSource::Local,
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Where installations from this store are recorded as coming from.
    pub fn source(&self) -> RulesetSource {
        self.source
    }

    pub fn sets_dir(&self) -> NormalizedPath {
        self.root.join(RulesetsPath::SetsDir.as_str())
    }

    pub fn ruleset_dir(&self, name: &str) -> NormalizedPath {
        self.sets_dir().join(name)
    }

    pub fn metadata_path(&self, name: &str) -> NormalizedPath {
        self.ruleset_dir(name).join(RulesetsPath::Metadata.as_str())
    }

    pub fn rules_path(&self, name: &str) -> NormalizedPath {
        self.ruleset_dir(name).join(RulesetsPath::Rules.as_str())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.metadata_path(name).is_file()
    }

    /// Parse and validate `meta.toml`.
    pub fn load_metadata(&self, name: &str) -> Result<RulesetMetadata> {
        validate_ruleset_name(name)?;
        let path = self.metadata_path(name);
        let metadata: RulesetMetadata = ConfigStore::new().load(&path)?;

        if metadata.set.name.trim().is_empty() {
            return Err(Error::MissingField {
                field: "set.name".to_string(),
                path: path.to_native(),
            });
        }
        Ok(metadata)
    }

    /// Read `rules.md`; a missing file is an empty rule text.
    pub fn load_rules(&self, name: &str) -> Result<String> {
        validate_ruleset_name(name)?;
        Ok(io::read_optional_text(&self.rules_path(name))?.unwrap_or_default())
    }

    /// Load metadata and rule text, attributing any failure to `name`.
    pub fn load(&self, name: &str) -> Result<(RulesetMetadata, String)> {
        let load = || -> Result<(RulesetMetadata, String)> {
            Ok((self.load_metadata(name)?, self.load_rules(name)?))
        };
        load().map_err(|e| Error::load(name, e))
    }

    /// Names of all rulesets in the store, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let dir = self.sets_dir();
        let entries = match std::fs::read_dir(dir.to_native()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(rulesets_fs::Error::io(dir.to_native(), e).into()),
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| self.exists(name))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Required rulesets that do not exist in this store.
    pub fn missing_requirements(&self, name: &str) -> Result<Vec<String>> {
        let metadata = self.load_metadata(name)?;
        Ok(metadata
            .requires
            .sets
            .into_iter()
            .filter(|required| !self.exists(required))
            .collect())
    }

    /// Create a new ruleset on disk.
    ///
    /// The generated display name capitalizes the first letter of `name`
    /// and the version starts at `1.0.0`.
    pub fn create(&self, name: &str, spec: CreateRuleset) -> Result<RulesetMetadata> {
        validate_ruleset_name(name)?;
        if self.exists(name) {
            return Err(Error::AlreadyExists(name.to_string()));
        }
        for parent in &spec.extends {
            validate_ruleset_name(parent)?;
        }

        let mut metadata = spec.metadata.unwrap_or_default();
        if metadata.set.name.trim().is_empty() {
            metadata.set.name = capitalize(name);
        }
        if metadata.set.version.trim().is_empty() {
            metadata.set.version = DEFAULT_VERSION.to_string();
        }
        if !spec.extends.is_empty() {
            metadata.extends = Extends { sets: spec.extends };
        }

        ConfigStore::new().save(&self.metadata_path(name), &metadata)?;
        if !spec.rules.is_empty() {
            io::write_text(&self.rules_path(name), &spec.rules)?;
        }

        tracing::info!(ruleset = name, path = %self.ruleset_dir(name), "Created ruleset");
        Ok(metadata)
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

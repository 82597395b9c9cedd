//! Recursive composition with cycle detection

use std::collections::BTreeMap;

use super::CompositionCache;
use crate::ruleset::{RulesetMetadata, RulesetStore};
use crate::{Error, Result};

/// A ruleset with its whole inheritance chain flattened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposedRuleset {
    pub name: String,
    /// Parent texts then own text, separated by blank lines
    pub rules: String,
    /// The ruleset's own metadata
    pub metadata: RulesetMetadata,
    /// Overrides merged down the chain; nearer rulesets win
    pub overrides: BTreeMap<String, toml::Value>,
}

impl ComposedRuleset {
    pub fn version(&self) -> &str {
        self.metadata.version()
    }
}

/// Composes rulesets from a [`RulesetStore`], caching results.
#[derive(Debug)]
pub struct CompositionEngine {
    store: RulesetStore,
    cache: CompositionCache,
}

impl CompositionEngine {
    pub fn new(store: RulesetStore) -> Self {
        Self {
            store,
            cache: CompositionCache::new(),
        }
    }

    pub fn store(&self) -> &RulesetStore {
        &self.store
    }

    pub fn cache(&self) -> &CompositionCache {
        &self.cache
    }

    /// Drop all cached compositions so the next compose rereads sources.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Compose `name` and every ruleset it transitively extends.
    ///
    /// Fails with [`Error::Load`] when any ruleset in the chain cannot be
    /// read and [`Error::CircularDependency`] when the chain loops.
    pub fn compose(&mut self, name: &str) -> Result<ComposedRuleset> {
        self.compose_within(name, &[])
    }

    fn compose_within(&mut self, name: &str, chain: &[String]) -> Result<ComposedRuleset> {
        // Checked before the cache so a cached ancestor can't mask a cycle.
        if chain.iter().any(|seen| seen == name) {
            let mut chain = chain.to_vec();
            chain.push(name.to_string());
            return Err(Error::CircularDependency {
                name: name.to_string(),
                chain,
            });
        }

        if let Some(cached) = self.cache.get(name) {
            tracing::trace!(ruleset = name, "Composition cache hit");
            return Ok(cached.clone());
        }

        let (metadata, own_rules) = self.store.load(name)?;

        let mut path = chain.to_vec();
        path.push(name.to_string());

        let mut sections = Vec::with_capacity(metadata.parents().len() + 1);
        let mut overrides = BTreeMap::new();
        for parent in metadata.parents() {
            let composed = self.compose_within(parent, &path)?;
            sections.push(composed.rules);
            overrides.extend(composed.overrides);
        }
        overrides.extend(metadata.overrides.clone());
        sections.push(own_rules);

        let rules = sections
            .iter()
            .map(|section| section.trim_matches('\n'))
            .filter(|section| !section.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        let composed = ComposedRuleset {
            name: name.to_string(),
            rules,
            metadata,
            overrides,
        };

        tracing::debug!(
            ruleset = name,
            version = composed.version(),
            parents = composed.metadata.parents().len(),
            "Composed ruleset"
        );
        self.cache.insert(name, composed.clone());
        Ok(composed)
    }
}

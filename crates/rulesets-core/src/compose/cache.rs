//! Generation-tagged cache of composed rulesets

use std::collections::HashMap;

use super::ComposedRuleset;

#[derive(Debug, Clone)]
struct Entry {
    generation: u64,
    composed: ComposedRuleset,
}

/// Cache keyed by ruleset name.
///
/// Every entry is stamped with the generation current at insert time.
/// [`invalidate`](Self::invalidate) advances the generation, so all earlier
/// entries become misses without touching them; they are replaced on the
/// next insert for the same name.
#[derive(Debug, Clone, Default)]
pub struct CompositionCache {
    generation: u64,
    entries: HashMap<String, Entry>,
}

impl CompositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fresh entry for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&ComposedRuleset> {
        self.entries
            .get(name)
            .filter(|entry| entry.generation == self.generation)
            .map(|entry| &entry.composed)
    }

    pub fn insert(&mut self, name: impl Into<String>, composed: ComposedRuleset) {
        self.entries.insert(
            name.into(),
            Entry {
                generation: self.generation,
                composed,
            },
        );
    }

    /// Mark every cached composition stale.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        tracing::trace!(generation = self.generation, "Composition cache invalidated");
    }

    /// Number of fresh entries.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.generation == self.generation)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

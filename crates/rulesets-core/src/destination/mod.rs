//! Destination files
//!
//! Each supported tool reads its instructions from one file in the project.
//! A destination id names that file; a [`DestinationWriter`] knows how to
//! write and excise one ruleset's region in it.

mod region;

pub use region::RegionFileDestination;

use rulesets_blocks::RemoveOutcome;
use rulesets_fs::NormalizedPath;

/// Built-in destination ids and their project-relative files
pub const BUILTIN_DESTINATIONS: &[(&str, &str)] = &[
    ("claude-code", ".claude/CLAUDE.md"),
    ("cursor", ".cursor/rules/ruleset.md"),
    ("windsurf", ".windsurf/rules/ruleset.md"),
    ("agents-md", "AGENTS.md"),
    ("copilot", ".github/copilot/instructions.md"),
];

/// Writes rulesets into one destination file.
pub trait DestinationWriter: Send + Sync + std::fmt::Debug {
    /// Destination id, e.g. `claude-code`
    fn id(&self) -> &str;

    /// File path relative to the project root
    fn relative_path(&self) -> &str;

    /// Absolute file path for a project rooted at `root`.
    fn path(&self, root: &NormalizedPath) -> NormalizedPath {
        root.join(self.relative_path())
    }

    /// Write `content` as `ruleset`'s region, creating the file if needed.
    fn write(
        &self,
        root: &NormalizedPath,
        ruleset: &str,
        content: &str,
    ) -> rulesets_blocks::Result<NormalizedPath>;

    /// Current content of `ruleset`'s region; `None` when absent.
    fn read(&self, root: &NormalizedPath, ruleset: &str) -> rulesets_blocks::Result<Option<String>>;

    /// Excise `ruleset`'s region, deleting the file when nothing remains.
    fn remove(&self, root: &NormalizedPath, ruleset: &str) -> rulesets_blocks::Result<RemoveOutcome>;
}

/// Lookup table from destination id to writer.
#[derive(Debug)]
pub struct DestinationRegistry {
    writers: Vec<Box<dyn DestinationWriter>>,
}

impl DestinationRegistry {
    /// Registry holding the built-in destinations.
    pub fn new() -> Self {
        let writers = BUILTIN_DESTINATIONS
            .iter()
            .map(|(id, path)| {
                Box::new(RegionFileDestination::new(*id, *path)) as Box<dyn DestinationWriter>
            })
            .collect();
        Self { writers }
    }

    /// Add or replace a writer.
    pub fn register(&mut self, writer: Box<dyn DestinationWriter>) {
        self.writers.retain(|existing| existing.id() != writer.id());
        self.writers.push(writer);
    }

    pub fn get(&self, id: &str) -> Option<&dyn DestinationWriter> {
        self.writers
            .iter()
            .find(|writer| writer.id() == id)
            .map(|writer| writer.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.writers.iter().map(|writer| writer.id()).collect()
    }

    /// Absolute file path for destination `id`, if known.
    pub fn path_for(&self, root: &NormalizedPath, id: &str) -> Option<NormalizedPath> {
        self.get(id).map(|writer| writer.path(root))
    }
}

impl Default for DestinationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_paths() {
        let registry = DestinationRegistry::new();
        let root = NormalizedPath::new("/project");

        assert_eq!(
            registry.path_for(&root, "claude-code").unwrap().as_str(),
            "/project/.claude/CLAUDE.md"
        );
        assert_eq!(
            registry.path_for(&root, "agents-md").unwrap().as_str(),
            "/project/AGENTS.md"
        );
        assert!(registry.path_for(&root, "emacs").is_none());
    }

    #[test]
    fn test_ids_in_table_order() {
        let registry = DestinationRegistry::new();
        assert_eq!(
            registry.ids(),
            vec!["claude-code", "cursor", "windsurf", "agents-md", "copilot"]
        );
    }

    #[test]
    fn test_register_replaces_existing_id() {
        let mut registry = DestinationRegistry::new();
        registry.register(Box::new(RegionFileDestination::new("agents-md", "docs/AGENTS.md")));

        assert_eq!(registry.ids().len(), BUILTIN_DESTINATIONS.len());
        assert_eq!(registry.get("agents-md").unwrap().relative_path(), "docs/AGENTS.md");
    }
}

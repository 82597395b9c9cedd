//! Destination backed by managed regions

use std::borrow::Cow;

use rulesets_blocks::{
    RemoveOutcome, read_region_from_file, remove_region_from_file, upsert_region_in_file,
};
use rulesets_fs::NormalizedPath;

use super::DestinationWriter;

/// A destination file shared between rulesets, one delimited region each.
#[derive(Debug, Clone)]
pub struct RegionFileDestination {
    id: Cow<'static, str>,
    relative_path: Cow<'static, str>,
}

impl RegionFileDestination {
    pub fn new(id: impl Into<Cow<'static, str>>, relative_path: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: id.into(),
            relative_path: relative_path.into(),
        }
    }
}

impl DestinationWriter for RegionFileDestination {
    fn id(&self) -> &str {
        &self.id
    }

    fn relative_path(&self) -> &str {
        &self.relative_path
    }

    fn write(
        &self,
        root: &NormalizedPath,
        ruleset: &str,
        content: &str,
    ) -> rulesets_blocks::Result<NormalizedPath> {
        let path = self.path(root);
        upsert_region_in_file(&path, ruleset, content)?;
        Ok(path)
    }

    fn read(&self, root: &NormalizedPath, ruleset: &str) -> rulesets_blocks::Result<Option<String>> {
        read_region_from_file(&self.path(root), ruleset)
    }

    fn remove(&self, root: &NormalizedPath, ruleset: &str) -> rulesets_blocks::Result<RemoveOutcome> {
        remove_region_from_file(&self.path(root), ruleset)
    }
}

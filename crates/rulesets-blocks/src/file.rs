//! File-level region edits.

use crate::document::RegionDocument;
use crate::error::Result;
use crate::marker::{validate_region_content, validate_region_name};
use rulesets_fs::{NormalizedPath, io};

/// What happened to a file when a region was removed from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The file does not exist.
    FileMissing,
    /// The file exists but holds no region with that name.
    RegionAbsent,
    /// The region was removed and other content remains.
    Removed,
    /// The region was the only content; the file was deleted.
    FileDeleted {
        /// The parent directory became empty and was deleted too.
        parent_removed: bool,
    },
}

impl RemoveOutcome {
    /// True when the region was present and is now gone.
    pub fn removed(&self) -> bool {
        matches!(self, Self::Removed | Self::FileDeleted { .. })
    }
}

/// Write `content` as `name`'s region into the file at `path`.
///
/// Other regions and unmanaged text are preserved; a missing file is
/// created along with its parent directories. Content holding a delimiter
/// line is rejected before the file is read.
pub fn upsert_region_in_file(path: &NormalizedPath, name: &str, content: &str) -> Result<()> {
    validate_region_name(name)?;
    validate_region_content(name, content)?;

    let existing = io::read_optional_text(path)?.unwrap_or_default();
    let mut document = RegionDocument::parse(&existing);
    document.upsert(name, content);
    io::write_text(path, &document.render())?;

    tracing::debug!(path = %path, region = name, "Wrote region");
    Ok(())
}

/// Content of `name`'s region in the file at `path`.
///
/// `None` when the file does not exist or holds no such region.
pub fn read_region_from_file(path: &NormalizedPath, name: &str) -> Result<Option<String>> {
    let Some(existing) = io::read_optional_text(path)? else {
        return Ok(None);
    };
    Ok(RegionDocument::parse(&existing)
        .region(name)
        .map(|region| region.content.clone()))
}

/// Excise `name`'s region from the file at `path`.
///
/// When nothing but whitespace remains the file is deleted, followed by its
/// parent directory if that is now empty.
pub fn remove_region_from_file(path: &NormalizedPath, name: &str) -> Result<RemoveOutcome> {
    let Some(existing) = io::read_optional_text(path)? else {
        return Ok(RemoveOutcome::FileMissing);
    };

    let mut document = RegionDocument::parse(&existing);
    if !document.remove(name) {
        return Ok(RemoveOutcome::RegionAbsent);
    }

    if document.is_blank() {
        let parent_removed = io::remove_file_and_empty_parent(path)?;
        tracing::debug!(path = %path, region = name, parent_removed, "Deleted emptied file");
        return Ok(RemoveOutcome::FileDeleted { parent_removed });
    }

    io::write_text(path, &document.render())?;
    tracing::debug!(path = %path, region = name, "Removed region");
    Ok(RemoveOutcome::Removed)
}

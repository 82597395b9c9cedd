//! Named region documents for shared destination files.
//!
//! Several rulesets can be installed into the same destination file. Each
//! one owns a region delimited by comment markers:
//!
//! ```text
//! <!-- rulesets:begin typescript -->
//! rule text
//! <!-- rulesets:end typescript -->
//! ```
//!
//! A file is parsed once into a [`RegionDocument`], a sequence of unmanaged
//! text segments and named regions. Edits operate on that structure and the
//! file is rendered back in one piece; nothing is patched in place with
//! pattern substitution.

pub mod document;
pub mod error;
pub mod file;
pub mod marker;

pub use document::{Region, RegionDocument};
pub use error::{Error, Result};
pub use file::{RemoveOutcome, read_region_from_file, remove_region_from_file, upsert_region_in_file};
pub use marker::{validate_region_content, validate_region_name};

//! Region delimiter lines.

use crate::error::{Error, Result};

const BEGIN_PREFIX: &str = "<!-- rulesets:begin ";
const END_PREFIX: &str = "<!-- rulesets:end ";
const SUFFIX: &str = " -->";

/// A delimiter recognised on a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Marker<'a> {
    Begin(&'a str),
    End(&'a str),
}

/// Opening delimiter for the region owned by `name`.
pub fn begin_marker(name: &str) -> String {
    format!("{BEGIN_PREFIX}{name}{SUFFIX}")
}

/// Closing delimiter for the region owned by `name`.
pub fn end_marker(name: &str) -> String {
    format!("{END_PREFIX}{name}{SUFFIX}")
}

/// Recognise a delimiter line. Surrounding whitespace is ignored.
pub(crate) fn classify(line: &str) -> Option<Marker<'_>> {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix(BEGIN_PREFIX) {
        return rest.strip_suffix(SUFFIX).filter(|n| is_valid(n)).map(Marker::Begin);
    }
    if let Some(rest) = line.strip_prefix(END_PREFIX) {
        return rest.strip_suffix(SUFFIX).filter(|n| is_valid(n)).map(Marker::End);
    }
    None
}

fn is_valid(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '/'))
}

/// Check that `name` can be written into a delimiter and read back.
pub fn validate_region_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "name cannot be empty".to_string(),
        });
    }
    if !is_valid(name) {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "only alphanumerics and '-', '_', '.', '@', '/' are allowed".to_string(),
        });
    }
    Ok(())
}

/// Check that `content` can be wrapped in `name`'s delimiters and parsed
/// back unchanged.
///
/// A content line that reads as any region delimiter would close or open a
/// region early on the next parse.
pub fn validate_region_content(name: &str, content: &str) -> Result<()> {
    match content.lines().position(|line| classify(line).is_some()) {
        Some(idx) => Err(Error::InvalidContent {
            name: name.to_string(),
            line: idx + 1,
        }),
        None => Ok(()),
    }
}

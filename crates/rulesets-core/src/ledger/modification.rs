//! Local modifications reapplied on sync

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Why a modification could not be applied
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    #[error("pattern '{pattern}' no longer matches the upstream content")]
    NoMatch { pattern: String },

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// A user edit to installed content, recorded so it survives re-installs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    #[serde(flatten)]
    pub kind: ModificationKind,
    /// Destination id the edit was made in
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModificationKind {
    /// Text concatenated after the content
    Append { content: String },
    /// Text concatenated before the content
    Prepend { content: String },
    Replace(ReplaceSpec),
}

/// Structured regex replacement
///
/// `flags` is any combination of `i` (case-insensitive), `m` (multi-line),
/// `s` (dot matches newline), `x` (verbose) and `g` (replace every match
/// instead of the first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceSpec {
    pub match_pattern: String,
    #[serde(default)]
    pub flags: String,
    pub replacement: String,
}

impl ReplaceSpec {
    pub fn new(
        match_pattern: impl Into<String>,
        flags: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            match_pattern: match_pattern.into(),
            flags: flags.into(),
            replacement: replacement.into(),
        }
    }

    /// Compile the pattern with its flags.
    pub fn regex(&self) -> Result<Regex, ApplyError> {
        let invalid = |reason: String| ApplyError::InvalidPattern {
            pattern: self.match_pattern.clone(),
            reason,
        };

        let mut builder = RegexBuilder::new(&self.match_pattern);
        for flag in self.flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                'g' => &mut builder,
                other => return Err(invalid(format!("unsupported flag '{other}'"))),
            };
        }
        builder.build().map_err(|e| invalid(e.to_string()))
    }

    pub fn is_global(&self) -> bool {
        self.flags.contains('g')
    }

    pub fn apply(&self, content: &str) -> Result<String, ApplyError> {
        let regex = self.regex()?;
        if !regex.is_match(content) {
            return Err(ApplyError::NoMatch {
                pattern: self.match_pattern.clone(),
            });
        }

        let replaced = if self.is_global() {
            regex.replace_all(content, self.replacement.as_str())
        } else {
            regex.replace(content, self.replacement.as_str())
        };
        Ok(replaced.into_owned())
    }
}

impl Modification {
    pub fn new(destination: impl Into<String>, kind: ModificationKind) -> Self {
        Self {
            kind,
            destination: destination.into(),
            timestamp: None,
        }
    }

    pub fn append(destination: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(
            destination,
            ModificationKind::Append {
                content: content.into(),
            },
        )
    }

    pub fn prepend(destination: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(
            destination,
            ModificationKind::Prepend {
                content: content.into(),
            },
        )
    }

    pub fn replace(
        destination: impl Into<String>,
        match_pattern: impl Into<String>,
        flags: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self::new(
            destination,
            ModificationKind::Replace(ReplaceSpec::new(match_pattern, flags, replacement)),
        )
    }

    /// Stamp the modification with `timestamp`.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn apply(&self, content: &str) -> Result<String, ApplyError> {
        match &self.kind {
            ModificationKind::Append { content: extra } => Ok(format!("{content}{extra}")),
            ModificationKind::Prepend { content: extra } => Ok(format!("{extra}{content}")),
            ModificationKind::Replace(spec) => spec.apply(content),
        }
    }
}

/// Apply `modifications` to `content` in order.
///
/// Stops at the first modification that cannot be applied.
pub fn apply_modifications(
    content: &str,
    modifications: &[Modification],
) -> Result<String, ApplyError> {
    modifications
        .iter()
        .try_fold(content.to_string(), |acc, modification| modification.apply(&acc))
}

//! Forward-slash path type shared by every stored path

use std::fmt;
use std::path::{Path, PathBuf};

/// A path spelled with forward slashes.
///
/// Ledger entries, snapshot keys and history records store paths as text, so
/// each path gets one spelling on every platform. Convert with
/// [`to_native`](Self::to_native) right before touching the filesystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: path.as_ref().to_string_lossy().replace('\\', "/"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Platform-native form for I/O.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Append a relative path, which may hold several segments.
    pub fn join(&self, relative: &str) -> Self {
        let relative = relative.replace('\\', "/");
        let inner = match self.inner.as_str() {
            "" => relative,
            base if base.ends_with('/') => format!("{base}{relative}"),
            base => format!("{base}/{relative}"),
        };
        Self { inner }
    }

    /// The containing directory; `None` for a bare file name.
    pub fn parent(&self) -> Option<Self> {
        let (head, _) = self.inner.trim_end_matches('/').rsplit_once('/')?;
        Some(Self {
            inner: if head.is_empty() { "/".to_string() } else { head.to_string() },
        })
    }

    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        let name = trimmed.rsplit_once('/').map_or(trimmed, |(_, name)| name);
        (!name.is_empty()).then_some(name)
    }

    /// Extension of the file name; dotfiles such as `.rulesets` have none.
    pub fn extension(&self) -> Option<&str> {
        match self.file_name()?.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Some(ext),
            _ => None,
        }
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

//! Out-of-band edit detection
//!
//! After a successful install the content of each destination file is
//! snapshotted. A later drift check hashes the file again and reports a
//! [`DriftEntry`], with a line diff, for every file whose hash no longer
//! matches its snapshot. Compilations and drifts are appended to a JSONL
//! history log.

mod detector;
mod diff;
mod history;
mod snapshot;

pub use detector::{DriftCheck, DriftDetector, DriftReport};
pub use diff::line_diff;
pub use history::{
    CompilationEntry, CompiledRef, DriftEntry, DriftKind, HistoryEntry, HistoryLog, HistoryQuery,
    SourceRef,
};
pub use snapshot::{DriftSnapshot, SnapshotStore};

//! Line diff rendering

use similar::{ChangeTag, TextDiff};

/// Render a line diff of `old` against `new`.
///
/// Each line is prefixed with `+` (added), `-` (removed) or a space
/// (unchanged). Blank lines are omitted.
pub fn line_diff(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut lines = Vec::new();

    for change in diff.iter_all_changes() {
        let prefix = match change.tag() {
            ChangeTag::Insert => '+',
            ChangeTag::Delete => '-',
            ChangeTag::Equal => ' ',
        };
        lines.extend(
            change
                .value()
                .split('\n')
                .filter(|line| !line.is_empty())
                .map(|line| format!("{prefix}{line}")),
        );
    }

    lines.join("\n")
}

//! Line-level diff stats and a bounded change preview for reporting.
//! Reporting-only: nothing here feeds back into the edit pipeline.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

/// Changed lines shown before the preview is truncated.
const PREVIEW_MAX_LINES: usize = 16;

/// Aggregate line counts for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
}

/// Compute line diff stats plus a bounded preview.
///
/// Preview lines are formatted `<line-number> <+/-> <text>`, using the new
/// file's numbering for insertions and the old file's for deletions. When
/// more than [`PREVIEW_MAX_LINES`] lines changed, the preview ends with an
/// `… and N more changes` marker.
pub fn diff_report(original: &str, modified: &str) -> (DiffStats, String) {
    let diff = TextDiff::from_lines(original, modified);

    let mut stats = DiffStats {
        added: 0,
        removed: 0,
    };
    let mut preview = String::new();
    let mut shown = 0usize;
    let mut omitted = 0usize;

    for change in diff.iter_all_changes() {
        let (sign, line_no) = match change.tag() {
            ChangeTag::Insert => {
                stats.added += 1;
                ('+', change.new_index())
            }
            ChangeTag::Delete => {
                stats.removed += 1;
                ('-', change.old_index())
            }
            ChangeTag::Equal => continue,
        };

        if shown >= PREVIEW_MAX_LINES {
            omitted += 1;
            continue;
        }
        shown += 1;

        let line_no = line_no.map(|i| i + 1).unwrap_or(0);
        let text = change.value().trim_end_matches('\n');
        preview.push_str(&format!("{line_no} {sign} {text}\n"));
    }

    if omitted > 0 {
        preview.push_str(&format!("… and {omitted} more changes\n"));
    }

    (stats, preview)
}

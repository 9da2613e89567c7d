//! Match resolution: locate a search text in a content snapshot and decide
//! whether the operation is legal before performing the substitution.
//!
//! Matching is literal, non-overlapping substring scanning. Regex search is
//! deliberately unsupported.

use crate::operation::EditOperation;

/// Characters of the search text used to probe for a partial match when the
/// full text is absent.
const PARTIAL_PROBE_CHARS: usize = 20;

/// Context window (per side) around an excerpt, in characters.
const CONTEXT_CHARS: usize = 50;

/// Minimum line similarity for the fuzzy fallback to report anything.
const SIMILARITY_FLOOR: f64 = 0.6;

/// Outcome of resolving one operation against one content snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Content after the substitution.
    pub content: String,
    /// Non-overlapping occurrences of the search text that were replaced.
    pub occurrences: usize,
}

/// Resolution failures. The session layer attaches the operation index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    NotFound { context: String },
    Ambiguous { count: usize, context: String },
}

/// Resolve one operation against the current content.
///
/// Occurrences are counted by non-overlapping literal scanning. Zero
/// occurrences fails with a diagnostic excerpt; more than one without
/// `replace_all` fails as ambiguous. Otherwise the substitution is
/// performed (leftmost occurrence only unless `replace_all`).
pub fn resolve(content: &str, op: &EditOperation) -> Result<Resolution, ResolveError> {
    let search = op.search();
    let count = content.matches(search).count();

    if count == 0 {
        return Err(ResolveError::NotFound {
            context: nearest_context(content, search),
        });
    }

    if count > 1 && !op.replace_all() {
        let first = content.find(search).expect("count > 0 implies a match");
        return Err(ResolveError::Ambiguous {
            count,
            context: format!(
                "first occurrence: \"{}\"",
                excerpt(content, first, search.len())
            ),
        });
    }

    let (content, occurrences) = if op.replace_all() {
        (content.replace(search, op.replacement()), count)
    } else {
        (content.replacen(search, op.replacement(), 1), 1)
    };

    Ok(Resolution {
        content,
        occurrences,
    })
}

/// Diagnostic context for a failed match.
///
/// Probes for the first 20 characters of the search text; if that partial
/// match exists, excerpt the content around it. Otherwise fall back to the
/// most similar line, and failing that, note that a previous edit in the
/// chain may already have removed the target text.
fn nearest_context(content: &str, search: &str) -> String {
    let probe: String = search.chars().take(PARTIAL_PROBE_CHARS).collect();

    if let Some(pos) = content.find(probe.as_str()) {
        return format!(
            "closest partial match: \"{}\"",
            excerpt(content, pos, probe.len())
        );
    }

    if let Some((line_no, line)) = most_similar_line(content, search) {
        return format!("most similar line {}: \"{}\"", line_no, line.trim());
    }

    "no partial match found; a previous edit may have already removed the target text".to_string()
}

/// Slice `content` around `[start, start + len)` with up to
/// `CONTEXT_CHARS` characters of context on each side, clamped to char
/// boundaries.
fn excerpt(content: &str, start: usize, len: usize) -> &str {
    let mut lo = start.saturating_sub(CONTEXT_CHARS);
    while lo > 0 && !content.is_char_boundary(lo) {
        lo -= 1;
    }

    let mut hi = (start + len).saturating_add(CONTEXT_CHARS).min(content.len());
    while hi < content.len() && !content.is_char_boundary(hi) {
        hi += 1;
    }

    &content[lo..hi]
}

/// Best-scoring line by Jaro-Winkler similarity against the search text's
/// first line. Returns a 1-based line number.
fn most_similar_line<'a>(content: &'a str, search: &str) -> Option<(usize, &'a str)> {
    let needle = search.lines().next()?.trim();
    if needle.is_empty() {
        return None;
    }

    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line, strsim::jaro_winkler(line.trim(), needle)))
        .filter(|(_, _, score)| *score >= SIMILARITY_FLOOR)
        .max_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(line_no, line, _)| (line_no, line))
}

//! The transactional core: dry-run the whole operation chain, and only if
//! every operation succeeds, commit the identical chain and persist the
//! result atomically.

use crate::diff::{diff_report, DiffStats};
use crate::error::EngineError;
use crate::operation::{EditOperation, EditSession};
use crate::persist::atomic_write;
use crate::resolve::{resolve, ResolveError};
use serde::Serialize;
use std::fs;
use xxhash_rust::xxh3::xxh3_64;

/// Per-operation outcome within a successful session.
///
/// Failed operations never produce an outcome; the session's terminal error
/// carries the failing index and reason instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    pub index: usize,
    pub occurrences_replaced: usize,
}

/// Full report for a successful session. Constructed only after the dry-run
/// pass completed every operation; discarded after being returned (the
/// engine holds no state between sessions).
#[derive(Debug, Clone, Serialize)]
pub struct SessionResult {
    pub original_content: String,
    pub final_content: String,
    pub outcomes: Vec<EditOutcome>,
    pub diff_stats: DiffStats,
    pub preview: String,
    pub total_replaced: usize,
}

/// Feed `content` through every operation in order, each one seeing the
/// previous operation's output. Pure: no I/O, no shared state.
///
/// Aborts on the first failing operation; operations after the failure
/// point are not evaluated.
pub fn apply_chain(
    content: &str,
    operations: &[EditOperation],
) -> Result<(String, Vec<EditOutcome>), EngineError> {
    let mut current = content.to_string();
    let mut outcomes = Vec::with_capacity(operations.len());

    for (index, op) in operations.iter().enumerate() {
        let resolution = resolve(&current, op).map_err(|e| match e {
            ResolveError::NotFound { context } => EngineError::SearchNotFound { index, context },
            ResolveError::Ambiguous { count, context } => EngineError::AmbiguousMatch {
                index,
                count,
                context,
            },
        })?;

        outcomes.push(EditOutcome {
            index,
            occurrences_replaced: resolution.occurrences,
        });
        current = resolution.content;
    }

    Ok((current, outcomes))
}

impl EditSession {
    /// Run the session against the filesystem: read, dry-run, commit,
    /// atomic write.
    ///
    /// All-or-nothing: on any error the target file's bytes are exactly
    /// what they were before the call. No retries; a failure is final.
    ///
    /// The engine provides no file locking. Callers that run concurrent
    /// sessions against the same path must serialize access themselves.
    pub fn run(&self) -> Result<SessionResult, EngineError> {
        let (result, final_content) = self.evaluate()?;
        atomic_write(self.target(), &final_content)?;
        Ok(result)
    }

    /// Dry-run only: the full pipeline minus the write. The returned
    /// result's `final_content` shows what `run` would have persisted.
    pub fn preview(&self) -> Result<SessionResult, EngineError> {
        let (result, _) = self.evaluate()?;
        Ok(result)
    }

    fn evaluate(&self) -> Result<(SessionResult, String), EngineError> {
        let original = fs::read_to_string(self.target())
            .map_err(|e| EngineError::from_io(self.target(), e))?;

        // Dry-run pass: must fully succeed before anything is written.
        let (dry_final, _) = apply_chain(&original, self.operations())?;

        if dry_final == original {
            return Err(EngineError::NoChanges);
        }

        let fingerprint = xxh3_64(dry_final.as_bytes());

        // Commit pass: re-apply the identical chain from the original
        // content. The two passes must agree byte-for-byte.
        let (final_content, outcomes) = apply_chain(&original, self.operations())?;
        if xxh3_64(final_content.as_bytes()) != fingerprint {
            return Err(EngineError::CommitDivergence);
        }

        let (diff_stats, preview) = diff_report(&original, &final_content);
        let total_replaced = outcomes.iter().map(|o| o.occurrences_replaced).sum();

        let result = SessionResult {
            original_content: original,
            final_content: final_content.clone(),
            outcomes,
            diff_stats,
            preview,
            total_replaced,
        };

        Ok((result, final_content))
    }
}

use crate::error::EngineError;
use crate::safety::validate_target;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One find/replace step in an edit session.
///
/// Instances only exist through [`EditOperation::new`], so a constructed
/// operation is always structurally valid: non-empty search text that
/// differs from its replacement. Fields stay private to keep that invariant
/// airtight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[must_use = "an EditOperation does nothing until run through a session"]
pub struct EditOperation {
    search: String,
    replacement: String,
    replace_all: bool,
}

/// Structural rejection reasons for a single operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("search text is empty")]
    EmptySearch,

    #[error("search and replacement are identical (no-op edit)")]
    NoOpReplacement,
}

impl EditOperation {
    /// Validating factory. Rules are checked in order: non-empty search
    /// first, then search != replacement. A no-op pair is rejected rather
    /// than silently accepted since it signals a caller-side bug.
    pub fn new(
        search: impl Into<String>,
        replacement: impl Into<String>,
        replace_all: bool,
    ) -> Result<Self, OperationError> {
        let search = search.into();
        let replacement = replacement.into();

        if search.is_empty() {
            return Err(OperationError::EmptySearch);
        }
        if search == replacement {
            return Err(OperationError::NoOpReplacement);
        }

        Ok(Self {
            search,
            replacement,
            replace_all,
        })
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn replace_all(&self) -> bool {
        self.replace_all
    }
}

/// One engine invocation: a single target file plus an ordered,
/// non-empty operation list.
///
/// Ordering is semantically significant: operation `i` is applied to the
/// content produced by operation `i - 1`, not to the original file.
#[derive(Debug, Clone)]
pub struct EditSession {
    target: PathBuf,
    operations: Vec<EditOperation>,
}

impl EditSession {
    /// Build a session from already-validated operations.
    ///
    /// Rejects relative or traversal-bearing target paths and empty
    /// operation lists before any file I/O happens.
    pub fn new(
        target: impl AsRef<Path>,
        operations: Vec<EditOperation>,
    ) -> Result<Self, EngineError> {
        let target = validate_target(target)?;

        if operations.is_empty() {
            return Err(EngineError::EmptySession);
        }

        Ok(Self { target, operations })
    }

    /// Build a session from raw `(search, replacement, replace_all)`
    /// triples, failing fast on the first structurally invalid operation
    /// with its index.
    pub fn from_raw<S, R>(
        target: impl AsRef<Path>,
        raw: impl IntoIterator<Item = (S, R, bool)>,
    ) -> Result<Self, EngineError>
    where
        S: Into<String>,
        R: Into<String>,
    {
        let mut operations = Vec::new();
        for (index, (search, replacement, replace_all)) in raw.into_iter().enumerate() {
            let op = EditOperation::new(search, replacement, replace_all)
                .map_err(|source| EngineError::InvalidOperation { index, source })?;
            operations.push(op);
        }
        Self::new(target, operations)
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn operations(&self) -> &[EditOperation] {
        &self.operations
    }
}

use crate::operation::OperationError;
use crate::safety::PathError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Terminal failure modes for an edit session.
///
/// Every variant aborts the whole session: either nothing was written yet
/// (validation and dry-run failures) or the temp file was cleaned up
/// (write/rename failures). The engine never retries and never partially
/// applies an operation list.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid operation at index {index}: {source}")]
    InvalidOperation {
        index: usize,
        #[source]
        source: OperationError,
    },

    #[error("operation list is empty")]
    EmptySession,

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("target file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("operation {index}: search text not found. {context}")]
    SearchNotFound { index: usize, context: String },

    #[error(
        "operation {index}: search text matched {count} locations (expected 1). \
         Set replace_all or add surrounding context to the search text. {context}"
    )]
    AmbiguousMatch {
        index: usize,
        count: usize,
        context: String,
    },

    #[error("edit chain produced content identical to the original")]
    NoChanges,

    #[error("commit pass diverged from dry run (content fingerprint mismatch)")]
    CommitDivergence,

    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("target is a directory: {}", path.display())]
    IsADirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no space left on device while writing {}", path.display())]
    NoSpace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EngineError {
    /// Re-tag an io error with the engine's error shape.
    ///
    /// Filesystem errors pass through under their own reason codes but are
    /// never reinterpreted beyond the kind mapping here.
    pub(crate) fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => EngineError::FileNotFound { path },
            io::ErrorKind::PermissionDenied => EngineError::PermissionDenied { path, source },
            io::ErrorKind::IsADirectory => EngineError::IsADirectory { path, source },
            io::ErrorKind::StorageFull => EngineError::NoSpace { path, source },
            _ => EngineError::Io { path, source },
        }
    }

    /// Stable machine-readable reason code, used by the CLI's JSON output.
    pub fn reason_code(&self) -> &'static str {
        match self {
            EngineError::InvalidOperation { .. } | EngineError::EmptySession => {
                "invalid_operation"
            }
            EngineError::Path(_) => "invalid_path",
            EngineError::FileNotFound { .. } => "file_not_found",
            EngineError::SearchNotFound { .. } => "search_not_found",
            EngineError::AmbiguousMatch { .. } => "ambiguous_match",
            EngineError::NoChanges => "no_changes",
            EngineError::CommitDivergence => "commit_divergence",
            EngineError::PermissionDenied { .. } => "permission_denied",
            EngineError::IsADirectory { .. } => "is_a_directory",
            EngineError::NoSpace { .. } => "no_space",
            EngineError::Io { .. } => "io_error",
        }
    }

    /// Index of the failing operation, when the failure is tied to one.
    pub fn failing_index(&self) -> Option<usize> {
        match self {
            EngineError::InvalidOperation { index, .. }
            | EngineError::SearchNotFound { index, .. }
            | EngineError::AmbiguousMatch { index, .. } => Some(*index),
            _ => None,
        }
    }
}

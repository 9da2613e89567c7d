use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Path vetting performed before any file I/O.
///
/// The engine only accepts absolute targets with no traversal segments, so a
/// rejected path never reaches the read or the temp-file write.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("target path must be absolute: {0}")]
    NotAbsolute(PathBuf),

    #[error("target path contains a traversal segment: {0}")]
    Traversal(PathBuf),
}

/// Validate an edit target, returning the path unchanged if acceptable.
///
/// The target may not exist yet (writes create it), so this checks the
/// lexical form rather than canonicalizing.
pub fn validate_target(path: impl AsRef<Path>) -> Result<PathBuf, PathError> {
    let path = path.as_ref();

    if !path.is_absolute() {
        return Err(PathError::NotAbsolute(path.to_path_buf()));
    }

    for component in path.components() {
        if matches!(component, Component::ParentDir | Component::CurDir) {
            return Err(PathError::Traversal(path.to_path_buf()));
        }
    }

    Ok(path.to_path_buf())
}

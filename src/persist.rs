//! Atomic file persistence: the target either contains the complete new
//! content or is left untouched, never a partial write.

use crate::error::EngineError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write `content` to `path` atomically.
///
/// The content goes to a temp file in the target's own directory (same
/// filesystem, so the rename is atomic), is fsynced, then renamed over the
/// target. `NamedTempFile` removes the temp file on drop, so a failure in
/// any step leaves only the prior target state behind; cleanup errors are
/// swallowed and the original error propagates.
///
/// Creates parent directories when the target does not exist yet.
pub fn atomic_write(path: &Path, content: &str) -> Result<(), EngineError> {
    let parent = path.parent().ok_or_else(|| EngineError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no parent directory",
        ),
    })?;

    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|e| EngineError::from_io(parent, e))?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut temp = tempfile::Builder::new()
        .prefix(&format!("{file_name}.tmp."))
        .tempfile_in(parent)
        .map_err(|e| EngineError::from_io(path, e))?;

    temp.write_all(content.as_bytes())
        .map_err(|e| EngineError::from_io(path, e))?;

    temp.as_file()
        .sync_all()
        .map_err(|e| EngineError::from_io(path, e))?;

    temp.persist(path)
        .map_err(|e| EngineError::from_io(path, e.error))?;

    // Refresh mtime so downstream watchers and build caches notice the swap.
    let now = filetime::FileTime::now();
    if let Err(e) = filetime::set_file_mtime(path, now) {
        return Err(EngineError::from_io(path, e));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "old").unwrap();

        atomic_write(&path, "new content").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new content");
    }

    #[test]
    fn test_write_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c/file.txt");

        atomic_write(&path, "fresh").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        atomic_write(&path, "payload").unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_failed_write_leaves_target_untouched() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "original").unwrap();

        // Read-only directory: the temp file cannot be created.
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o555)).unwrap();
        let result = atomic_write(&path, "replacement");
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(EngineError::PermissionDenied { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }
}

// Atomic artifact writes: a temp file in the destination directory is
// renamed over the target only once fully written and synced.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Result, SterileError};

/// Directory a file lives in, `.` for bare file names.
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// A fully written and synced temp file, not yet renamed over its target.
/// Dropping it without `commit` deletes the temp file.
#[derive(Debug)]
pub struct Staged {
    temp_file: NamedTempFile,
    target: PathBuf,
    bytes: usize,
}

impl Staged {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename the temp file over the target.
    pub fn commit(self) -> Result<PathBuf> {
        let Staged {
            temp_file,
            target,
            bytes,
        } = self;
        temp_file
            .persist(&target)
            .map_err(|e| SterileError::io(&target, e.error))?;
        tracing::debug!(path = %target.display(), bytes, "wrote artifact");
        Ok(target)
    }
}

/// Write `contents` to a temp file next to `path` without touching `path`.
pub fn stage(path: &Path, contents: &[u8]) -> Result<Staged> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir).map_err(|e| SterileError::io(dir, e))?;

    let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| SterileError::io(dir, e))?;
    temp_file
        .write_all(contents)
        .and_then(|_| temp_file.as_file().sync_all())
        .map_err(|e| SterileError::io(path, e))?;

    Ok(Staged {
        temp_file,
        target: path.to_path_buf(),
        bytes: contents.len(),
    })
}

pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    stage(path, contents)?.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        // No stray temp files left next to the artifact.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.txt");
        write_atomic(&path, b"x").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_into_file_path_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let err = write_atomic(&blocker.join("out.txt"), b"x").unwrap_err();
        assert!(matches!(err, SterileError::CorpusIo { .. }));
    }

    #[test]
    fn test_staged_file_invisible_until_commit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let staged = stage(&path, b"pending").unwrap();
        assert_eq!(staged.target(), path.as_path());
        assert!(!path.exists());
        assert_eq!(staged.commit().unwrap(), path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "pending");
    }

    #[test]
    fn test_dropped_stage_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        drop(stage(&path, b"abandoned").unwrap());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_commit_over_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("taken");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("inner"), b"x").unwrap();
        let err = stage(&target, b"x").unwrap().commit().unwrap_err();
        assert!(matches!(err, SterileError::CorpusIo { .. }));
    }

    #[test]
    fn test_parent_dir_of_bare_name() {
        assert_eq!(parent_dir(Path::new("x.xml")), Path::new("."));
        assert_eq!(parent_dir(Path::new("d/x.xml")), Path::new("d"));
    }
}

//! Filesystem capability used to carry the cancellation signal.
//!
//! The token only ever needs three operations on its signal file, so they are
//! kept behind a small trait. `DiskFs` is the real thing; `MemoryFs` lets
//! tests (and in-process callers) share a signal without touching disk.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Trait for signal file operations - allows mocking in tests
pub trait SignalFs {
    /// Whether the signal file currently exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create the file, truncating it if it already exists.
    fn create(&self, path: &Path) -> io::Result<()>;

    /// Remove the file. Returns `NotFound` if it is absent.
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Real filesystem implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl SignalFs for DiskFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create(&self, path: &Path) -> io::Result<()> {
        fs::write(path, b"")
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// In-memory filesystem. Clones share the same set of files.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> std::sync::MutexGuard<'_, HashSet<PathBuf>> {
        // A panic while holding the lock cannot leave the set half-updated.
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of files currently present.
    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }
}

impl SignalFs for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.files().contains(path)
    }

    fn create(&self, path: &Path) -> io::Result<()> {
        self.files().insert(path.to_path_buf());
        Ok(())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        if self.files().remove(path) {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            ))
        }
    }
}

impl<T: SignalFs + ?Sized> SignalFs for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn create(&self, path: &Path) -> io::Result<()> {
        (**self).create(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        (**self).remove(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_fs_create_exists_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signal");
        let fs = DiskFs;

        assert!(!fs.exists(&path));
        fs.create(&path).unwrap();
        assert!(fs.exists(&path));
        // creating twice truncates instead of failing
        fs.create(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap().len(), 0);

        fs.remove(&path).unwrap();
        assert!(!fs.exists(&path));
        assert_eq!(
            fs.remove(&path).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_memory_fs_clones_share_state() {
        let a = MemoryFs::new();
        let b = a.clone();
        let path = Path::new("/tmp/tsc-shared");

        a.create(path).unwrap();
        assert!(b.exists(path));
        assert_eq!(b.len(), 1);

        b.remove(path).unwrap();
        assert!(!a.exists(path));
        assert!(a.is_empty());
    }

    #[test]
    fn test_memory_fs_remove_missing_is_not_found() {
        let fs = MemoryFs::new();
        let err = fs.remove(Path::new("/tmp/tsc-missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}

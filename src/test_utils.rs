//! Shared test utilities for building tokens and fake filesystems.

use std::io;
use std::path::Path;

use crate::signal_fs::{MemoryFs, SignalFs};
use crate::token::CancellationToken;

/// Token bound to a shared in-memory filesystem
pub fn memory_token(
    identity: Option<&str>,
    initial_cancelled: bool,
    fs: &MemoryFs,
) -> CancellationToken<MemoryFs> {
    CancellationToken::with_identity(identity, initial_cancelled).with_fs(fs.clone())
}

/// Filesystem whose writes fail with `PermissionDenied`.
///
/// `exists` panics, so tests using it also prove the filesystem was never read.
#[derive(Debug)]
pub struct FailingFs;

impl SignalFs for FailingFs {
    fn exists(&self, path: &Path) -> bool {
        panic!("unexpected existence check on {}", path.display())
    }

    fn create(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }

    fn remove(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_token_shares_fs() {
        let fs = MemoryFs::new();
        let token = memory_token(Some("shared"), false, &fs);
        token.request_cancellation().unwrap();
        assert!(fs.exists(token.file_path()));
    }
}
